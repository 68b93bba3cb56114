//! Proto schema descriptors produced by the translator.
//!
//! These mirror the structure of a `.proto` file: a schema holds imports,
//! messages and enums; a message holds fields and nested enums. They are
//! plain data and can be serialized with serde for inspection.

use std::collections::BTreeMap;

use serde::Serialize;

/// A single message field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as declared in the input properties.
    pub name: String,

    /// Proto type: a scalar, `map<string, V>`, a message name, or an enum name.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Tag taken verbatim from `protobuf_sequence_number`.
    pub tag: Option<u32>,

    /// Whether the field is `repeated`.
    pub repeated: bool,

    /// Whether the field was listed in the owning object's `required`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

/// An enum type derived from an `atom` property with an `enum` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDescriptor {
    /// CamelCase name derived from the owning field.
    pub name: String,

    /// Literal → zero-based ordinal in declaration order.
    pub values: BTreeMap<String, u32>,
}

impl EnumDescriptor {
    /// Enum entries ordered by ordinal, the order they are written in.
    pub fn entries_by_ordinal(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> =
            self.values.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by_key(|(_, v)| *v);
        entries
    }
}

/// A proto message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    pub name: String,
    /// Sorted ascending by tag.
    pub fields: Vec<FieldDescriptor>,
    pub enums: Vec<EnumDescriptor>,
    /// Nested messages. Always empty: inline objects are not expanded.
    pub messages: Vec<MessageDescriptor>,
}

/// A complete proto file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDescriptor {
    /// Proto syntax version. Always `3`.
    pub syntax: u32,
    pub package: String,
    /// Imported file names, each ending in `.proto`.
    pub imports: Vec<String>,
    pub enums: Vec<EnumDescriptor>,
    pub messages: Vec<MessageDescriptor>,
    pub options: BTreeMap<String, String>,
    pub extends: Vec<MessageDescriptor>,
}

impl SchemaDescriptor {
    /// An empty proto3 schema for `package`.
    pub fn new(package: &str) -> Self {
        Self {
            syntax: 3,
            package: package.to_string(),
            imports: Vec::new(),
            enums: Vec::new(),
            messages: Vec::new(),
            options: BTreeMap::new(),
            extends: Vec::new(),
        }
    }
}
