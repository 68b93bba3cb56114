//! Collects the external message files referenced during one conversion.
//!
//! A fresh [`ImportCollector`] is created for every conversion and drained
//! once at the end, so nothing registered by one conversion can leak into
//! another.

use std::collections::BTreeSet;

use crate::type_map::to_snake_case;

/// Deduplicated set of referenced import identifiers.
#[derive(Debug, Default)]
pub struct ImportCollector {
    prefix: String,
    names: BTreeSet<String>,
}

impl ImportCollector {
    /// Create an empty collector that prefixes every identifier with `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            names: BTreeSet::new(),
        }
    }

    /// Register a reference to the message type `object_type`.
    ///
    /// The identifier is `<prefix><snake_case(object_type)>`.
    pub fn register_type(&mut self, object_type: &str) {
        let name = format!("{}{}", self.prefix, to_snake_case(object_type));
        self.register(name);
    }

    /// Register an already-formed import identifier.
    pub fn register(&mut self, name: String) {
        if self.names.insert(name) {
            tracing::debug!(count = self.names.len(), "registered import");
        }
    }

    /// Number of distinct identifiers registered so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been registered since the last drain.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Take every registered identifier as a `.proto` file name, leaving
    /// the collector empty.
    pub fn drain(&mut self) -> Vec<String> {
        let imports: Vec<String> = std::mem::take(&mut self.names)
            .into_iter()
            .map(|name| format!("{name}.proto"))
            .collect();
        tracing::debug!(imports = ?imports, "drained imports");
        imports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_type_prefixes_and_snake_cases() {
        let mut imports = ImportCollector::new("ipersist_");
        imports.register_type("PostalAddress");
        assert_eq!(imports.drain(), vec!["ipersist_postal_address.proto"]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let mut imports = ImportCollector::new("ipersist_");
        imports.register_type("Address");
        imports.register_type("Address");
        imports.register("ipersist_address".to_string());
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn drain_empties_the_collector() {
        let mut imports = ImportCollector::new("ipersist_");
        imports.register_type("Address");
        imports.register_type("Phone");
        assert_eq!(imports.drain().len(), 2);
        assert!(imports.is_empty());
        assert!(imports.drain().is_empty());
    }

    #[test]
    fn custom_prefix() {
        let mut imports = ImportCollector::new("");
        imports.register_type("Address");
        assert_eq!(imports.drain(), vec!["address.proto"]);
    }
}
