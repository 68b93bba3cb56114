//! Maps JSON schema type names to Protocol Buffer type strings, plus the
//! name casing helpers used to derive enum and import names.
//!
//! # Type Mapping Table
//!
//! | JSON schema type | Proto type | Notes |
//! |------------------|-----------|-------|
//! | `integer` | `uint32` | |
//! | `long` | `uint64` | |
//! | `number` | `int32` | |
//! | `string` | `string` | |
//! | `boolean` | `bool` | |
//! | `binary` | `bytes` | |
//! | `array` | `repeated` | Marker only; arrays are resolved from `items` |
//! | `object` | `message` | Marker only; objects are resolved from `object_type` |
//! | Anything else | unchanged | Passed through verbatim |

/// Map a JSON schema type name to a proto3 type string.
///
/// Unknown names are returned unchanged, so type names this crate does not
/// special-case (e.g. `double`, `sint64`, another message name) flow through
/// to the generated proto as written.
pub fn json_to_proto_type(type_name: &str) -> &str {
    match type_name {
        "array" => "repeated",
        "object" => "message",
        "integer" => "uint32",
        "long" => "uint64",
        "number" => "int32",
        "string" => "string",
        "boolean" => "bool",
        "binary" => "bytes",
        other => other,
    }
}

/// Convert a PascalCase type name to snake_case for import file names.
///
/// Every ASCII uppercase letter becomes `_` plus its lowercase form, except a
/// leading one which is only lowercased:
/// - `"Address"` → `"address"`
/// - `"PostalAddress"` → `"postal_address"`
/// - `"HTTPHeader"` → `"h_t_t_p_header"`
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a snake_case field name to CamelCase for enum type names.
///
/// - `"favorite_color"` → `"FavoriteColor"`
/// - `"status"` → `"Status"`
/// - `"http_statusCode"` → `"HttpStatusCode"`
pub fn to_camel_case(s: &str) -> String {
    s.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}
