//! Model loading and classification.
//!
//! Everything ecosystem-specific about a mongoose model lives here: the loader
//! reads a JSON model definition and classifies every raw value into a
//! [`SourceNode`] before the translator ever sees it.
//!
//! Model definition format:
//!
//! ```json
//! {
//!   "modelName": "User",
//!   "schema": {
//!     "_id": { "auto": true, "type": "ObjectId" },
//!     "name": "String",
//!     "tags": ["String"],
//!     "profile": { "$schema": { "bio": "String" } },
//!     "fullName": { "$virtual": true }
//!   }
//! }
//! ```
use std::path::PathBuf;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Marks a sub-schema (`new Schema({...})`) in a model file.
pub const EMBEDDED_SCHEMA_KEY: &str = "$schema";
/// Marks a virtual/computed path in a model file.
pub const VIRTUAL_KEY: &str = "$virtual";

// `mongoose.Schema.Types.ObjectId` → `ObjectId`, the way the constructor's own
// name would read. Unknown namespaces are left alone so the resolver reports
// them verbatim.
static QUALIFIED_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:mongoose\.)?(?:Schema\.)?(?:Types\.)?(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)$")
        .expect("static regex")
});

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

pub type SourceTree = IndexMap<String, SourceNode>;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    /// Bare type marker: `String`, `Number`, `ObjectId`, ...
    Primitive(String),
    /// A plain object: either options (`{type: Number, default: 0}`) or a
    /// nested field map (`{city: String}`).
    Options(SourceTree),
    /// Sub-schema reference, unwrapped.
    Embedded(SourceTree),
    /// `[element]`
    ArrayOf(Vec<SourceNode>),
    /// Virtuals and `false`.
    Ignored,
    /// Anything the loader could not classify.
    Unrecognized(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub collection_name: String,
    pub tree: SourceTree,
}

/// Supplies the classified root tree of a model.
pub trait SchemaSource {
    fn load_model(&self) -> Result<ModelDefinition>;
}

/// A model definition stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonModelFile {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModel {
    model_name: String,
    schema: Map<String, Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SourceNode {
    /// Classify a raw JSON value.
    pub fn classify(value: Value) -> SourceNode {
        match value {
            Value::String(name) => SourceNode::Primitive(normalize_type_name(&name)),
            Value::Bool(false) => SourceNode::Ignored,
            Value::Array(xs) => {
                SourceNode::ArrayOf(xs.into_iter().map(SourceNode::classify).collect())
            }
            Value::Object(mut map) => {
                if map.contains_key(VIRTUAL_KEY) {
                    return SourceNode::Ignored;
                }
                match map.get(EMBEDDED_SCHEMA_KEY).map(Value::is_object) {
                    None => SourceNode::Options(classify_tree(map)),
                    Some(true) if map.len() == 1 => match map.remove(EMBEDDED_SCHEMA_KEY) {
                        Some(Value::Object(inner)) => SourceNode::Embedded(classify_tree(inner)),
                        _ => SourceNode::Unrecognized(Value::Object(map)),
                    },
                    // a sub-schema with sibling paths would lose the siblings
                    Some(true) => SourceNode::Unrecognized(Value::Object(map)),
                    // an ordinary path that happens to be named `$schema`
                    Some(false) => SourceNode::Options(
                        map.into_iter()
                            .map(|(k, v)| {
                                let node = if k == EMBEDDED_SCHEMA_KEY {
                                    SourceNode::Unrecognized(v)
                                } else {
                                    SourceNode::classify(v)
                                };
                                (k, node)
                            })
                            .collect(),
                    ),
                }
            }
            other => SourceNode::Unrecognized(other),
        }
    }
}

pub fn classify_tree(map: Map<String, Value>) -> SourceTree {
    map.into_iter().map(|(k, v)| (k, SourceNode::classify(v))).collect()
}

fn normalize_type_name(name: &str) -> String {
    match QUALIFIED_TYPE.captures(name) {
        Some(caps) => caps["name"].to_string(),
        None => name.to_string(),
    }
}

impl ModelDefinition {
    pub fn new(collection_name: impl Into<String>, tree: SourceTree) -> Self {
        Self { collection_name: collection_name.into(), tree }
    }

    /// Parse a model definition document. The error string names the JSON
    /// path of the offending value.
    pub fn from_json_str(src: &str) -> std::result::Result<Self, String> {
        let raw = from_str_with_path::<RawModel>(src)?;
        if raw.model_name.trim().is_empty() {
            return Err("`modelName` must not be empty".to_string());
        }
        Ok(Self::new(raw.model_name, classify_tree(raw.schema)))
    }
}

impl SchemaSource for ModelDefinition {
    fn load_model(&self) -> Result<ModelDefinition> {
        Ok(self.clone())
    }
}

impl JsonModelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for JsonModelFile {
    fn load_model(&self) -> Result<ModelDefinition> {
        let source = std::fs::read_to_string(&self.path)
            .map_err(|error| Error::source_load(&self.path, error))?;
        let model = ModelDefinition::from_json_str(&source)
            .map_err(|reason| Error::source_load(&self.path, reason))?;
        tracing::debug!(
            path = %self.path.display(),
            collection = %model.collection_name,
            fields = model.tree.len(),
            "loaded model"
        );
        Ok(model)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> std::result::Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn primitive(name: &str) -> SourceNode {
        SourceNode::Primitive(name.to_string())
    }

    #[test]
    fn strings_become_primitives() {
        assert_eq!(SourceNode::classify(json!("Number")), primitive("Number"));
        assert_eq!(SourceNode::classify(json!("ObjectId")), primitive("ObjectId"));
    }

    #[test]
    fn qualified_type_names_are_shortened() {
        let qualified = [
            "Schema.Types.ObjectId",
            "mongoose.Schema.Types.ObjectId",
            "mongoose.ObjectId",
            "Types.ObjectId",
        ];
        for raw in qualified {
            assert_eq!(SourceNode::classify(json!(raw)), primitive("ObjectId"), "{raw}");
        }
        // unknown namespaces pass through untouched
        assert_eq!(SourceNode::classify(json!("bson.Long")), primitive("bson.Long"));
    }

    #[test]
    fn virtuals_and_false_are_ignored() {
        assert_eq!(SourceNode::classify(json!(false)), SourceNode::Ignored);
        let virtual_path = json!({"$virtual": true, "get": "fullName"});
        assert_eq!(SourceNode::classify(virtual_path), SourceNode::Ignored);
    }

    #[test]
    fn embedded_schema_is_unwrapped() {
        let node = SourceNode::classify(json!({"$schema": {"bio": "String", "age": "Number"}}));
        let SourceNode::Embedded(tree) = &node else {
            panic!("expected embedded, got {node:?}")
        };
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["bio", "age"]);
    }

    #[test]
    fn non_object_schema_key_is_an_ordinary_unrecognized_path() {
        let node = SourceNode::classify(json!({"$schema": "Profile", "x": "String"}));
        let SourceNode::Options(tree) = &node else {
            panic!("expected options, got {node:?}")
        };
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["$schema", "x"]);
        assert_eq!(tree["$schema"], SourceNode::Unrecognized(json!("Profile")));
        assert_eq!(tree["x"], primitive("String"));
    }

    #[test]
    fn embedded_schema_with_sibling_paths_is_unrecognized() {
        let raw = json!({"$schema": {"a": "String"}, "b": "Number"});
        assert_eq!(SourceNode::classify(raw.clone()), SourceNode::Unrecognized(raw));
    }

    #[test]
    fn scalars_other_than_false_are_unrecognized() {
        assert_eq!(SourceNode::classify(json!(5)), SourceNode::Unrecognized(json!(5)));
        assert_eq!(SourceNode::classify(json!(true)), SourceNode::Unrecognized(json!(true)));
        assert_eq!(SourceNode::classify(Value::Null), SourceNode::Unrecognized(Value::Null));
    }

    #[test]
    fn model_preserves_declared_field_order() {
        let model = ModelDefinition::from_json_str(concat!(
            r#"{"modelName": "User", "#,
            r#""schema": {"zeta": "String", "alpha": "Number", "mid": "Date"}}"#,
        ))
        .unwrap();
        assert_eq!(model.collection_name, "User");
        assert_eq!(model.tree.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn model_errors_name_json_path() {
        let err = ModelDefinition::from_json_str(r#"{"modelName": "User", "schema": []}"#)
            .unwrap_err();
        assert!(err.contains("schema"), "{err}");

        let err = ModelDefinition::from_json_str(r#"{"schema": {}}"#).unwrap_err();
        assert!(err.contains("modelName"), "{err}");

        let err = ModelDefinition::from_json_str(r#"{"modelName": " ", "schema": {}}"#)
            .unwrap_err();
        assert!(err.contains("must not be empty"), "{err}");
    }

    #[test]
    fn missing_model_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonModelFile::new(dir.path().join("nope.json")).load_model().unwrap_err();
        assert!(matches!(err, Error::SourceLoad { .. }), "{err:?}");
    }

    #[test]
    fn loads_model_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        std::fs::write(&path, r#"{"modelName": "User", "schema": {"name": "String"}}"#).unwrap();
        let model = JsonModelFile::new(&path).load_model().unwrap();
        assert_eq!(model.tree["name"], primitive("String"));
    }
}
