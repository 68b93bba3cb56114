//! Proto3 text output for a [`SchemaDescriptor`].
//!
//! Output layout: the `syntax` line, the `package` line (omitted for an
//! empty package), one `import` line per import, top-level enums, then
//! messages. Inside a message nested enums come before fields, and fields
//! keep their descriptor order.

use std::fmt::Write;

use crate::descriptor::{EnumDescriptor, FieldDescriptor, MessageDescriptor, SchemaDescriptor};
use crate::error::{Error, Result};

/// Render `schema` as `.proto` source text.
///
/// Fails with [`Error::MissingTag`] if any field has no tag.
pub fn to_proto(schema: &SchemaDescriptor) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "syntax = \"proto{}\";", schema.syntax).unwrap();

    if !schema.package.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "package {};", schema.package).unwrap();
    }

    if !schema.imports.is_empty() {
        writeln!(out).unwrap();
        for import in &schema.imports {
            writeln!(out, "import \"{import}\";").unwrap();
        }
    }

    for e in &schema.enums {
        writeln!(out).unwrap();
        write_enum(&mut out, e, 0);
    }

    for message in &schema.messages {
        writeln!(out).unwrap();
        write_message(&mut out, message, 0)?;
    }

    Ok(out)
}

fn write_message(out: &mut String, message: &MessageDescriptor, depth: usize) -> Result<()> {
    let indent = "\t".repeat(depth);
    writeln!(out, "{indent}message {} {{", message.name).unwrap();

    for (i, e) in message.enums.iter().enumerate() {
        if i > 0 {
            writeln!(out).unwrap();
        }
        write_enum(out, e, depth + 1);
    }

    for (i, nested) in message.messages.iter().enumerate() {
        if i > 0 || !message.enums.is_empty() {
            writeln!(out).unwrap();
        }
        write_message(out, nested, depth + 1)?;
    }

    if !message.fields.is_empty() && !(message.enums.is_empty() && message.messages.is_empty()) {
        writeln!(out).unwrap();
    }

    for field in &message.fields {
        write_field(out, &message.name, field, depth + 1)?;
    }

    writeln!(out, "{indent}}}").unwrap();
    Ok(())
}

fn write_field(
    out: &mut String,
    message_name: &str,
    field: &FieldDescriptor,
    depth: usize,
) -> Result<()> {
    let tag = field.tag.ok_or_else(|| Error::MissingTag {
        message: message_name.to_string(),
        field: field.name.clone(),
    })?;
    let indent = "\t".repeat(depth);
    let repeated_kw = if field.repeated { "repeated " } else { "" };
    // proto3 has no `required` label.
    let required_note = if field.required { " // required" } else { "" };

    writeln!(
        out,
        "{indent}{repeated_kw}{} {} = {tag};{required_note}",
        field.type_name, field.name
    )
    .unwrap();
    Ok(())
}

fn write_enum(out: &mut String, e: &EnumDescriptor, depth: usize) {
    let indent = "\t".repeat(depth);
    writeln!(out, "{indent}enum {} {{", e.name).unwrap();
    for (literal, ordinal) in e.entries_by_ordinal() {
        writeln!(out, "{indent}\t{literal} = {ordinal};").unwrap();
    }
    writeln!(out, "{indent}}}").unwrap();
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn field(name: &str, type_name: &str, tag: u32) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            type_name: type_name.to_string(),
            tag: Some(tag),
            repeated: false,
            required: false,
        }
    }

    #[test]
    fn renders_complete_message() {
        let mut schema = SchemaDescriptor::new("people");
        schema.imports.push("ipersist_address.proto".to_string());
        schema.messages.push(MessageDescriptor {
            name: "Person".to_string(),
            fields: vec![
                FieldDescriptor {
                    required: true,
                    ..field("name", "string", 1)
                },
                field("address", "Address", 2),
                FieldDescriptor {
                    repeated: true,
                    ..field("nicknames", "string", 3)
                },
                field("color", "Color", 4),
            ],
            enums: vec![EnumDescriptor {
                name: "Color".to_string(),
                values: BTreeMap::from([("RED".to_string(), 0), ("BLUE".to_string(), 1)]),
            }],
            messages: vec![],
        });

        let proto = to_proto(&schema).unwrap();
        let expected = "syntax = \"proto3\";\n\
                        \n\
                        package people;\n\
                        \n\
                        import \"ipersist_address.proto\";\n\
                        \n\
                        message Person {\n\
                        \tenum Color {\n\
                        \t\tRED = 0;\n\
                        \t\tBLUE = 1;\n\
                        \t}\n\
                        \n\
                        \tstring name = 1; // required\n\
                        \tAddress address = 2;\n\
                        \trepeated string nicknames = 3;\n\
                        \tColor color = 4;\n\
                        }\n";
        assert_eq!(proto, expected);
    }

    #[test]
    fn renders_map_field_verbatim() {
        let mut schema = SchemaDescriptor::new("");
        schema.messages.push(MessageDescriptor {
            name: "Bag".to_string(),
            fields: vec![field("tags", "map<string, string>", 1)],
            enums: vec![],
            messages: vec![],
        });
        let proto = to_proto(&schema).unwrap();
        assert!(!proto.contains("package"));
        assert!(proto.contains("\tmap<string, string> tags = 1;\n"));
    }

    #[test]
    fn import_only_schema() {
        let mut schema = SchemaDescriptor::new("mypkg");
        schema.imports = vec!["a.proto".to_string(), "b.proto".to_string()];
        assert_eq!(
            to_proto(&schema).unwrap(),
            "syntax = \"proto3\";\n\npackage mypkg;\n\nimport \"a.proto\";\nimport \"b.proto\";\n"
        );
    }

    #[test]
    fn missing_tag_is_an_error() {
        let mut schema = SchemaDescriptor::new("pkg");
        schema.messages.push(MessageDescriptor {
            name: "Thing".to_string(),
            fields: vec![FieldDescriptor {
                tag: None,
                ..field("id", "string", 0)
            }],
            enums: vec![],
            messages: vec![],
        });
        let err = to_proto(&schema).unwrap_err();
        assert!(matches!(err, Error::MissingTag { .. }));
        assert!(err.to_string().contains("Thing"));
    }
}
