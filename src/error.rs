//! Error types for the jsonschema-proto-gen crate.

use std::path::PathBuf;

/// Errors that can occur while translating a JSON schema into a proto schema.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input text is not valid JSON, or does not have the schema node shape.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write generated output.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A property has no `type` attribute.
    #[error("field '{field}' has no type")]
    MissingType { field: String },

    /// An array property has no `items` definition.
    #[error("array field '{field}' has no items definition")]
    MissingItems { field: String },

    /// An object property is neither a typed reference nor a raw map.
    #[error(
        "field '{field}' is an inline object (no object_type or additionalProperties); \
         nested messages are not supported"
    )]
    InlineObject { field: String },

    /// A raw map property whose `additionalProperties` has no value type.
    #[error("map field '{field}' has no additionalProperties.type")]
    MissingMapValueType { field: String },

    /// An array of objects whose items do not name the referenced type.
    #[error("array field '{field}' has object items without an object_type")]
    ArrayItemMissingObjectType { field: String },

    /// An `atom` property whose `enum` is not an array of strings.
    #[error("enum field '{field}' must list string literals")]
    InvalidEnum { field: String },

    /// An object node built into a message has no `protobuf_name`.
    #[error("object schema has no protobuf_name")]
    MissingMessageName,

    /// A field reached the renderer without a tag.
    #[error("field '{field}' in message '{message}' has no protobuf_sequence_number")]
    MissingTag { message: String, field: String },
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
