//! Recursive mongoose tree → Spark `StructType` lowering.
//!
//! A field value can take several shapes, tried in this order:
//!
//! - `__v` and ignored nodes (virtuals, `false`) produce nothing
//! - embedded schemas are unwrapped and handled like a plain object
//! - `String`, `ObjectId`, ...: a primitive field
//! - `{type: Number, default: 0}`: options form, only `type` survives
//! - `{city: String}`: nested struct
//! - `[{kind: String}]`: array of struct
//! - `[String]`: collapses to the element's own field (no array wrapper)
//!
//! Anything else is an [`Error::UnparseableField`].
use serde_json::Value;

use crate::error::{Error, Result};
use crate::ir::{TargetField, TargetType};
use crate::resolve::TypeResolver;
use crate::source::{SourceNode, SourceTree};

/// Mongoose's document version counter; never part of the table schema.
pub const VERSION_KEY: &str = "__v";

const OPTIONS_TYPE_KEY: &str = "type";

#[derive(Debug, Clone, Copy)]
pub struct SchemaTranslator<'a> {
    resolver: TypeResolver<'a>,
}

impl Default for SchemaTranslator<'static> {
    fn default() -> Self {
        Self::new(TypeResolver::default())
    }
}

impl<'a> SchemaTranslator<'a> {
    pub fn new(resolver: TypeResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Map mode: lower every entry of `tree`, in declaration order.
    /// `parent` is the dotted path of the enclosing field (empty at the root).
    pub fn translate_fields(&self, tree: &SourceTree, parent: &str) -> Result<Vec<TargetField>> {
        let mut fields = Vec::with_capacity(tree.len());
        for (key, node) in tree {
            if let Some(field) = self.translate_field(key, node, parent)? {
                fields.push(field);
            }
        }
        Ok(fields)
    }

    /// Single-field mode. `None` means the field is excluded from the output.
    pub fn translate_field(
        &self,
        key: &str,
        node: &SourceNode,
        parent: &str,
    ) -> Result<Option<TargetField>> {
        let path = join_path(parent, key);
        self.field_at(key, node, &path)
    }

    fn field_at(&self, key: &str, node: &SourceNode, path: &str) -> Result<Option<TargetField>> {
        if key == VERSION_KEY {
            return Ok(None);
        }
        match node {
            SourceNode::Ignored => {
                tracing::debug!(path, "skipping ignored field");
                Ok(None)
            }
            SourceNode::Primitive(type_name) => {
                let primitive = self.resolver.resolve(type_name, path)?;
                tracing::debug!(
                    path,
                    mongoose = %type_name,
                    spark = primitive.as_str(),
                    "primitive field"
                );
                Ok(Some(TargetField::new(key, TargetType::Primitive(primitive))))
            }
            SourceNode::Options(tree) | SourceNode::Embedded(tree) => {
                self.object_field(key, tree, path)
            }
            SourceNode::ArrayOf(elements) => self.array_field(key, elements, path),
            SourceNode::Unrecognized(raw) => Err(unparseable(path, raw.clone())),
        }
    }

    fn object_field(
        &self,
        key: &str,
        tree: &SourceTree,
        path: &str,
    ) -> Result<Option<TargetField>> {
        // {type: Number, default: 0, enum: [...]}: only `type` has a Spark equivalent
        if let Some(marker) = options_type(tree) {
            return self.field_at(key, marker, path);
        }
        let fields = self.translate_fields(tree, path)?;
        tracing::debug!(path, fields = fields.len(), "struct field");
        Ok(Some(TargetField::new(key, TargetType::Struct(fields))))
    }

    fn array_field(
        &self,
        key: &str,
        elements: &[SourceNode],
        path: &str,
    ) -> Result<Option<TargetField>> {
        let Some(element) = elements.first() else {
            return Err(unparseable(path, Value::Array(Vec::new())));
        };
        if elements.len() > 1 {
            tracing::warn!(
                path,
                ignored = elements.len() - 1,
                "array marker has more than one element, using the first"
            );
        }
        match element {
            SourceNode::Options(tree) | SourceNode::Embedded(tree)
                if options_type(tree).is_none() =>
            {
                let fields = self.translate_fields(tree, path)?;
                tracing::debug!(path, fields = fields.len(), "array of struct field");
                Ok(Some(TargetField::new(key, TargetType::array_of(TargetType::Struct(fields)))))
            }
            // [String] is emitted exactly like String
            other => self.field_at(key, other, path),
        }
    }
}

/// The `type` entry of an options object, if it is a bare type marker.
fn options_type(tree: &SourceTree) -> Option<&SourceNode> {
    match tree.get(OPTIONS_TYPE_KEY) {
        Some(marker @ SourceNode::Primitive(_)) => Some(marker),
        _ => None,
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn unparseable(path: &str, value: Value) -> Error {
    Error::UnparseableField { path: path.to_string(), value }
}
