//! JSON schema input types, loading, and field shape classification.
//!
//! The input is a JSON-Schema-like document extended with `object_type`,
//! `protobuf_sequence_number` and `protobuf_name`. Nodes are deserialized
//! permissively into [`SchemaNode`]; each property is then classified into
//! exactly one [`FieldShape`] so the field translator never has to probe
//! attribute combinations.

use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// One node of the input schema tree.
///
/// All attributes are optional at this level. Which ones are meaningful
/// depends on `type`; see [`FieldShape::classify`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    /// JSON schema type name (e.g. `"object"`, `"array"`, `"atom"`, `"string"`).
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,

    /// Object properties in document order.
    #[serde(default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<(String, SchemaNode)>,

    /// Element definition for `array` nodes.
    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,

    /// Enumeration literals. Only `atom` nodes use them, and only there
    /// must they be strings; other types may carry any JSON values.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Value>,

    /// Name of the referenced message type for typed object references.
    #[serde(default)]
    pub object_type: Option<String>,

    /// Value definition for raw map objects. Kept untyped because JSON
    /// schema also allows a bare boolean here.
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: Option<Value>,

    /// Names of properties that must be present. A draft-3 style
    /// `"required": true` on a property reads as an empty list.
    #[serde(default, deserialize_with = "deserialize_required")]
    pub required: Vec<String>,

    /// Explicit proto field tag.
    #[serde(default)]
    pub protobuf_sequence_number: Option<u32>,

    /// Proto message name for object nodes.
    #[serde(default)]
    pub protobuf_name: Option<String>,
}

impl SchemaNode {
    /// Parse a schema node from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Interpret an already-parsed JSON value as a schema node.
    ///
    /// A root that is not a JSON object (e.g. `[]` or `"x"`) reads as a
    /// node without a type.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Ok(SchemaNode::default());
        }
        Ok(SchemaNode::deserialize(value)?)
    }

    /// Whether this node has `type: "object"`.
    pub fn is_object(&self) -> bool {
        self.type_name.as_deref() == Some("object")
    }
}

/// Deserialize `properties` into an ordered list of `(name, node)` pairs.
///
/// Relies on `serde_json`'s `preserve_order` feature so the list follows the
/// order in which properties appear in the document.
fn deserialize_properties<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, SchemaNode)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
    map.iter()
        .map(|(name, value)| {
            SchemaNode::deserialize(value)
                .map(|node| (name.clone(), node))
                .map_err(|e| D::Error::custom(format!("property '{name}': {e}")))
        })
        .collect()
}

/// Deserialize `required`, keeping only the string entries of an array.
fn deserialize_required<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let names = match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(names)
}

/// The translation-relevant shape of a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// Any non-object, non-array, non-atom type.
    Scalar { type_name: String },
    /// `object` with an `object_type`: a reference to another message.
    ObjectReference { object_type: String },
    /// `object` without `object_type` but with `additionalProperties`.
    RawMap { value_type: String },
    /// `array`, resolved from its `items`.
    Array { items: ArrayItems },
    /// `atom` carrying an `enum` list.
    AtomEnum { values: Vec<String> },
    /// `atom` without an `enum` list.
    AtomPlain,
}

/// The element shape of an array property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayItems {
    /// Items reference another message type.
    Object { object_type: String },
    /// Items of any other type, kept as written. An `object_type` on such
    /// items still registers an import.
    Scalar {
        type_name: String,
        object_type: Option<String>,
    },
}

impl FieldShape {
    /// Classify the property `field` described by `node`.
    ///
    /// Object references win over raw maps when a node declares both
    /// `object_type` and `additionalProperties`. Inline object definitions
    /// (neither attribute) are rejected.
    pub fn classify(field: &str, node: &SchemaNode) -> Result<Self> {
        let type_name = node
            .type_name
            .as_deref()
            .ok_or_else(|| Error::MissingType {
                field: field.to_string(),
            })?;

        let shape = match type_name {
            "object" => match (&node.object_type, &node.additional_properties) {
                (Some(object_type), additional) => {
                    if additional.is_some() {
                        tracing::warn!(
                            field,
                            object_type = object_type.as_str(),
                            "object field has both object_type and additionalProperties; treating as reference"
                        );
                    }
                    FieldShape::ObjectReference {
                        object_type: object_type.clone(),
                    }
                }
                (None, Some(additional)) => {
                    let value_type = additional
                        .get("type")
                        .and_then(Value::as_str)
                        .ok_or_else(|| Error::MissingMapValueType {
                            field: field.to_string(),
                        })?;
                    FieldShape::RawMap {
                        value_type: value_type.to_string(),
                    }
                }
                (None, None) => {
                    return Err(Error::InlineObject {
                        field: field.to_string(),
                    });
                }
            },
            "array" => {
                let items = node.items.as_deref().ok_or_else(|| Error::MissingItems {
                    field: field.to_string(),
                })?;
                FieldShape::Array {
                    items: ArrayItems::classify(field, items)?,
                }
            }
            "atom" => match &node.enum_values {
                Some(values) => FieldShape::AtomEnum {
                    values: enum_literals(field, values)?,
                },
                None => FieldShape::AtomPlain,
            },
            other => FieldShape::Scalar {
                type_name: other.to_string(),
            },
        };
        Ok(shape)
    }
}

impl ArrayItems {
    fn classify(field: &str, items: &SchemaNode) -> Result<Self> {
        let type_name = items
            .type_name
            .as_deref()
            .ok_or_else(|| Error::MissingType {
                field: format!("{field}.items"),
            })?;

        if type_name == "object" {
            let object_type = items.object_type.clone().ok_or_else(|| {
                Error::ArrayItemMissingObjectType {
                    field: field.to_string(),
                }
            })?;
            return Ok(ArrayItems::Object { object_type });
        }

        Ok(ArrayItems::Scalar {
            type_name: type_name.to_string(),
            object_type: items.object_type.clone(),
        })
    }
}

/// Read the literals of an `atom` enum, which must be an array of strings.
fn enum_literals(field: &str, values: &Value) -> Result<Vec<String>> {
    let invalid = || Error::InvalidEnum {
        field: field.to_string(),
    };
    values
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// Load a schema document from disk.
pub fn load_schema(path: &Path) -> Result<SchemaNode> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    SchemaNode::parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(value: Value) -> Result<FieldShape> {
        let node = SchemaNode::from_value(&value).unwrap();
        FieldShape::classify("field", &node)
    }

    #[test]
    fn properties_keep_document_order() {
        let node = SchemaNode::parse(
            r#"{
                "type": "object",
                "protobuf_name": "Person",
                "properties": {
                    "zeta": {"type": "string", "protobuf_sequence_number": 1},
                    "alpha": {"type": "string", "protobuf_sequence_number": 2},
                    "mid": {"type": "string", "protobuf_sequence_number": 3}
                }
            }"#,
        )
        .unwrap();
        let names: Vec<&str> = node.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert!(node.is_object());
        assert_eq!(node.protobuf_name.as_deref(), Some("Person"));
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = SchemaNode::parse("{\"type\": ").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn bad_property_names_the_property() {
        let err = SchemaNode::parse(
            r#"{"type": "object", "properties": {"color": {"type": "atom", "protobuf_sequence_number": "one"}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn non_object_root_reads_as_untyped() {
        for text in ["[]", "\"x\"", "42", "null"] {
            let node = SchemaNode::parse(text).unwrap();
            assert!(node.type_name.is_none(), "expected no type for {text}");
            assert!(!node.is_object());
        }
    }

    #[test]
    fn boolean_required_reads_as_empty() {
        let node = SchemaNode::from_value(&json!({"type": "string", "required": true})).unwrap();
        assert!(node.required.is_empty());

        let node = SchemaNode::from_value(&json!({"required": ["id", 3, "name"]})).unwrap();
        assert_eq!(node.required, ["id", "name"]);
    }

    #[test]
    fn enum_on_scalar_is_ignored() {
        assert_eq!(
            classify(json!({"type": "integer", "enum": [1, 2, 3]})).unwrap(),
            FieldShape::Scalar {
                type_name: "integer".to_string()
            }
        );
    }

    #[test]
    fn atom_enum_requires_string_literals() {
        let err = classify(json!({"type": "atom", "enum": [1, 2]})).unwrap_err();
        assert!(matches!(err, Error::InvalidEnum { ref field } if field == "field"));

        let err = classify(json!({"type": "atom", "enum": "RED"})).unwrap_err();
        assert!(matches!(err, Error::InvalidEnum { .. }));
    }

    #[test]
    fn classify_scalar() {
        assert_eq!(
            classify(json!({"type": "integer"})).unwrap(),
            FieldShape::Scalar {
                type_name: "integer".to_string()
            }
        );
    }

    #[test]
    fn classify_object_reference() {
        assert_eq!(
            classify(json!({"type": "object", "object_type": "Address"})).unwrap(),
            FieldShape::ObjectReference {
                object_type: "Address".to_string()
            }
        );
    }

    #[test]
    fn classify_reference_wins_over_map() {
        let shape = classify(json!({
            "type": "object",
            "object_type": "Address",
            "additionalProperties": {"type": "string"}
        }))
        .unwrap();
        assert!(matches!(shape, FieldShape::ObjectReference { .. }));
    }

    #[test]
    fn classify_raw_map() {
        assert_eq!(
            classify(json!({"type": "object", "additionalProperties": {"type": "string"}}))
                .unwrap(),
            FieldShape::RawMap {
                value_type: "string".to_string()
            }
        );
    }

    #[test]
    fn classify_raw_map_without_value_type() {
        let err = classify(json!({"type": "object", "additionalProperties": true})).unwrap_err();
        assert!(matches!(err, Error::MissingMapValueType { .. }));
    }

    #[test]
    fn classify_inline_object_is_rejected() {
        let err = classify(json!({"type": "object", "properties": {}})).unwrap_err();
        assert!(matches!(err, Error::InlineObject { .. }));
    }

    #[test]
    fn classify_atoms() {
        assert_eq!(
            classify(json!({"type": "atom", "enum": ["A", "B"]})).unwrap(),
            FieldShape::AtomEnum {
                values: vec!["A".to_string(), "B".to_string()]
            }
        );
        assert_eq!(classify(json!({"type": "atom"})).unwrap(), FieldShape::AtomPlain);
    }

    #[test]
    fn classify_arrays() {
        assert_eq!(
            classify(json!({"type": "array", "items": {"type": "integer"}})).unwrap(),
            FieldShape::Array {
                items: ArrayItems::Scalar {
                    type_name: "integer".to_string(),
                    object_type: None,
                }
            }
        );
        assert_eq!(
            classify(json!({"type": "array", "items": {"type": "Ref", "object_type": "Ref"}}))
                .unwrap(),
            FieldShape::Array {
                items: ArrayItems::Scalar {
                    type_name: "Ref".to_string(),
                    object_type: Some("Ref".to_string()),
                }
            }
        );
        assert_eq!(
            classify(json!({"type": "array", "items": {"type": "object", "object_type": "Tag"}}))
                .unwrap(),
            FieldShape::Array {
                items: ArrayItems::Object {
                    object_type: "Tag".to_string()
                }
            }
        );
    }

    #[test]
    fn classify_array_errors() {
        let err = classify(json!({"type": "array"})).unwrap_err();
        assert!(matches!(err, Error::MissingItems { .. }));

        let err = classify(json!({"type": "array", "items": {"type": "object"}})).unwrap_err();
        assert!(matches!(err, Error::ArrayItemMissingObjectType { .. }));

        let err = classify(json!({"type": "array", "items": {}})).unwrap_err();
        assert_eq!(err.to_string(), "field 'field.items' has no type");
    }

    #[test]
    fn classify_missing_type() {
        let err = classify(json!({"protobuf_sequence_number": 1})).unwrap_err();
        assert!(matches!(err, Error::MissingType { .. }));
    }
}
