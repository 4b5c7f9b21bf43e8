// Strongly-typed target IR: the Spark `StructType` tree, before rendering.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Spark primitive type names this tool can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPrimitive {
    String,
    Timestamp,
    Boolean,
    Float,
}

impl TargetPrimitive {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetPrimitive::String => "string",
            TargetPrimitive::Timestamp => "timestamp",
            TargetPrimitive::Boolean => "boolean",
            TargetPrimitive::Float => "float",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
    Primitive(TargetPrimitive),
    Struct(Vec<TargetField>),   // source order, never sorted
    Array {
        element_type: Box<TargetType>,
        contains_null: bool,
    },
}

impl TargetType {
    pub fn array_of(element_type: TargetType) -> Self {
        TargetType::Array { element_type: Box::new(element_type), contains_null: true }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TargetField {
    // field order here is the key order of the rendered document
    pub metadata: Map<String, Value>,
    pub nullable: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TargetType,
}

impl TargetField {
    /// A field with the structural defaults: nullable, empty metadata.
    pub fn new(name: impl Into<String>, ty: TargetType) -> Self {
        Self { metadata: Map::new(), nullable: true, name: name.into(), ty }
    }
}

impl Serialize for TargetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TargetType::Primitive(p) => serializer.serialize_str(p.as_str()),
            TargetType::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "struct")?;
                map.serialize_entry("fields", fields)?;
                map.end()
            }
            TargetType::Array { element_type, contains_null } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("elementType", element_type)?;
                map.serialize_entry("containsNull", contains_null)?;
                map.end()
            }
        }
    }
}
