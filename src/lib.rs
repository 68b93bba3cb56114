//! Generate Protocol Buffer definitions from JSON schema object descriptions.
//!
//! `jsonschema-proto-gen` reads a JSON-Schema-like document describing one
//! object (with `object_type`, `protobuf_sequence_number` and
//! `protobuf_name` extensions) and produces the equivalent proto3 message,
//! its enums, and the imports for every referenced message type.
//!
//! # Features
//!
//! - Maps JSON schema primitive types to proto3 scalars
//! - Translates `additionalProperties` objects to `map<string, V>` fields
//! - Resolves `object_type` references to message types plus imports
//!   named `ipersist_<snake_case>.proto`
//! - Generates nested enums for `atom` properties with an `enum` list
//! - Keeps the declared field tags; fields are ordered by tag
//! - Builds import-only umbrella files with [`codegen::combine`]
//!
//! # Usage
//!
//! ```
//! let schema = serde_json::json!({
//!     "type": "object",
//!     "protobuf_name": "Person",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string", "protobuf_sequence_number": 1 },
//!         "address": { "type": "object", "object_type": "Address", "protobuf_sequence_number": 2 }
//!     }
//! });
//!
//! let proto = jsonschema_proto_gen::codegen::convert(&schema, "people")?;
//! assert!(proto.contains("import \"ipersist_address.proto\";"));
//! assert!(proto.contains("Address address = 2;"));
//! # Ok::<(), jsonschema_proto_gen::error::Error>(())
//! ```

pub mod codegen;
pub mod descriptor;
pub mod error;
pub mod imports;
pub mod render;
pub mod schema;
pub mod type_map;
