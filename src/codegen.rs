//! Proto schema generation from JSON schema nodes.
//!
//! Translates an object [`SchemaNode`] into a [`SchemaDescriptor`]:
//! - Each property becomes one field, typed by its [`FieldShape`]
//! - `atom` properties with an `enum` list also produce a nested enum
//! - Referenced message types are collected into the import list
//!
//! Field tags come from `protobuf_sequence_number` and are never assigned or
//! renumbered here; fields are only sorted by them.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::descriptor::{EnumDescriptor, FieldDescriptor, MessageDescriptor, SchemaDescriptor};
use crate::error::{Error, Result};
use crate::imports::ImportCollector;
use crate::render;
use crate::schema::{ArrayItems, FieldShape, SchemaNode};
use crate::type_map::{json_to_proto_type, to_camel_case};

/// Prefix of generated import identifiers for referenced message types.
pub const DEFAULT_IMPORT_PREFIX: &str = "ipersist_";

/// Knobs for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Prepended to the snake_cased type name of every import.
    pub import_prefix: String,

    /// Run scalar array item types through the type map. Off by default:
    /// array items are written exactly as declared (`integer` stays `integer`).
    pub map_array_item_types: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            import_prefix: DEFAULT_IMPORT_PREFIX.to_string(),
            map_array_item_types: false,
        }
    }
}

/// Convert a parsed JSON schema into proto3 text using default options.
pub fn convert(schema: &Value, package: &str) -> Result<String> {
    let root = SchemaNode::from_value(schema)?;
    convert_with(&root, package, &ConvertOptions::default())
}

/// Parse JSON schema text and convert it into proto3 text.
pub fn convert_str(text: &str, package: &str) -> Result<String> {
    let root = SchemaNode::parse(text)?;
    convert_with(&root, package, &ConvertOptions::default())
}

/// Convert a schema node into proto3 text.
pub fn convert_with(root: &SchemaNode, package: &str, options: &ConvertOptions) -> Result<String> {
    let schema = build_schema(root, package, options)?;
    render::to_proto(&schema)
}

/// Build the schema descriptor for `root`.
///
/// An object root produces one message; any other root produces a schema
/// with no messages. Imports are gathered by a collector owned by this call.
pub fn build_schema(
    root: &SchemaNode,
    package: &str,
    options: &ConvertOptions,
) -> Result<SchemaDescriptor> {
    let mut schema = SchemaDescriptor::new(package);
    let mut imports = ImportCollector::new(&options.import_prefix);

    if root.is_object() {
        schema
            .messages
            .push(build_message(root, &mut imports, options)?);
    }

    schema.imports = imports.drain();
    Ok(schema)
}

/// Render an umbrella proto file that only imports `imports`.
pub fn combine(imports: &[String], package: &str) -> Result<String> {
    render::to_proto(&combine_schema(imports, package))
}

/// Build a schema with no messages or enums, only the given imports.
pub fn combine_schema(imports: &[String], package: &str) -> SchemaDescriptor {
    let mut schema = SchemaDescriptor::new(package);
    schema.imports = imports.to_vec();
    schema
}

// ── Message generation ─────────────────────────────────────────────────

/// Build a message from an object node.
///
/// Fields are stable-sorted by tag, then marked required from the node's
/// `required` list. Required names with no matching field are ignored.
pub fn build_message(
    node: &SchemaNode,
    imports: &mut ImportCollector,
    options: &ConvertOptions,
) -> Result<MessageDescriptor> {
    let name = node
        .protobuf_name
        .clone()
        .ok_or(Error::MissingMessageName)?;

    let mut fields = Vec::with_capacity(node.properties.len());
    let mut enums = Vec::new();

    for (field_name, property) in &node.properties {
        let shape = FieldShape::classify(field_name, property)?;
        fields.push(field_from_shape(
            field_name,
            property.protobuf_sequence_number,
            &shape,
            imports,
            options,
        ));
        if let FieldShape::AtomEnum { values } = &shape {
            enums.push(build_enum(field_name, values));
        }
    }

    fields.sort_by_key(|f| f.tag);

    for required in &node.required {
        for field in fields.iter_mut().filter(|f| &f.name == required) {
            field.required = true;
        }
    }

    Ok(MessageDescriptor {
        name,
        fields,
        enums,
        messages: Vec::new(),
    })
}

// ── Field translation ──────────────────────────────────────────────────

/// Translate a single property into a field descriptor.
///
/// Object references (direct or as array items) register an import.
pub fn translate_field(
    name: &str,
    node: &SchemaNode,
    imports: &mut ImportCollector,
    options: &ConvertOptions,
) -> Result<FieldDescriptor> {
    let shape = FieldShape::classify(name, node)?;
    Ok(field_from_shape(
        name,
        node.protobuf_sequence_number,
        &shape,
        imports,
        options,
    ))
}

fn field_from_shape(
    name: &str,
    tag: Option<u32>,
    shape: &FieldShape,
    imports: &mut ImportCollector,
    options: &ConvertOptions,
) -> FieldDescriptor {
    let (type_name, repeated) = match shape {
        FieldShape::RawMap { value_type } => (format!("map<string, {value_type}>"), false),
        FieldShape::ObjectReference { object_type } => {
            imports.register_type(object_type);
            (object_type.clone(), false)
        }
        FieldShape::AtomEnum { .. } => (to_camel_case(name), false),
        FieldShape::AtomPlain => (json_to_proto_type("atom").to_string(), false),
        FieldShape::Scalar { type_name } => (json_to_proto_type(type_name).to_string(), false),
        FieldShape::Array { items } => match items {
            ArrayItems::Object { object_type } => {
                imports.register_type(object_type);
                (object_type.clone(), true)
            }
            ArrayItems::Scalar {
                type_name,
                object_type,
            } => {
                if let Some(object_type) = object_type {
                    imports.register_type(object_type);
                }
                let proto_type = if options.map_array_item_types {
                    json_to_proto_type(type_name)
                } else {
                    type_name
                };
                (proto_type.to_string(), true)
            }
        },
    };

    tracing::debug!(
        field = name,
        proto_type = type_name.as_str(),
        ?tag,
        repeated,
        "translated field"
    );

    FieldDescriptor {
        name: name.to_string(),
        type_name,
        tag,
        repeated,
        required: false,
    }
}

// ── Enum generation ────────────────────────────────────────────────────

/// Build the enum type for an `atom` field from its literals.
///
/// Ordinals follow declaration order. A repeated literal keeps the ordinal
/// of its last occurrence.
pub fn build_enum(field_name: &str, values: &[String]) -> EnumDescriptor {
    let mut map = BTreeMap::new();
    for (literal, ordinal) in values.iter().zip(0u32..) {
        map.insert(literal.clone(), ordinal);
    }
    EnumDescriptor {
        name: to_camel_case(field_name),
        values: map,
    }
}
