//! The `{collection_name, schema}` envelope and its canonical rendering.
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::ir::{TargetField, TargetType};

// Downstream tooling diffs these files; the indent is part of the format.
const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub collection_name: String,
    schema: TargetType,
}

pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn build(collection_name: impl Into<String>, fields: Vec<TargetField>) -> SchemaDocument {
        SchemaDocument {
            collection_name: collection_name.into(),
            schema: TargetType::Struct(fields),
        }
    }
}

impl SchemaDocument {
    /// Root is always a struct.
    pub fn fields(&self) -> &[TargetField] {
        match &self.schema {
            TargetType::Struct(fields) => fields,
            _ => &[],
        }
    }

    pub fn render(&self) -> Result<String> {
        Ok(to_pretty_string(self)?)
    }
}

/// `serde_json::to_string_pretty`, but with a 4-space indent.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::with_capacity(256);
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(out).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TargetPrimitive;

    #[test]
    fn renders_with_four_space_indent() {
        let doc = DocumentBuilder::build(
            "User",
            vec![TargetField::new("name", TargetType::Primitive(TargetPrimitive::String))],
        );
        let expected = r#"{
    "collection_name": "User",
    "schema": {
        "type": "struct",
        "fields": [
            {
                "metadata": {},
                "nullable": true,
                "name": "name",
                "type": "string"
            }
        ]
    }
}"#;
        assert_eq!(doc.render().unwrap(), expected);
    }

    #[test]
    fn empty_model_still_has_struct_root() {
        let doc = DocumentBuilder::build("Empty", Vec::new());
        assert!(doc.fields().is_empty());
        let value: serde_json::Value = serde_json::from_str(&doc.render().unwrap()).unwrap();
        assert_eq!(value["schema"]["type"], "struct");
        assert_eq!(value["schema"]["fields"], serde_json::json!([]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let build = || {
            DocumentBuilder::build(
                "Order",
                vec![
                    TargetField::new("placed", TargetType::Primitive(TargetPrimitive::Timestamp)),
                    TargetField::new(
                        "lines",
                        TargetType::array_of(TargetType::Struct(vec![TargetField::new(
                            "qty",
                            TargetType::Primitive(TargetPrimitive::Float),
                        )])),
                    ),
                ],
            )
        };
        assert_eq!(build().render().unwrap(), build().render().unwrap());
    }
}
