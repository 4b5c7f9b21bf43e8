//! Mongoose primitive type name → Spark primitive type name.
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::ir::TargetPrimitive;

// `Number` is always widened to `float`; mongoose does not tell integers apart.
pub static TYPE_MAPPINGS: Lazy<IndexMap<&'static str, TargetPrimitive>> = Lazy::new(|| {
    IndexMap::from([
        ("String", TargetPrimitive::String),
        ("Date", TargetPrimitive::Timestamp),
        ("ObjectId", TargetPrimitive::String),
        ("Boolean", TargetPrimitive::Boolean),
        ("Number", TargetPrimitive::Float),
    ])
});

#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    table: &'a IndexMap<&'static str, TargetPrimitive>,
}

impl Default for TypeResolver<'static> {
    fn default() -> Self {
        Self::new(&TYPE_MAPPINGS)
    }
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a IndexMap<&'static str, TargetPrimitive>) -> Self {
        Self { table }
    }

    /// `path` is only used to point at the field in the error.
    pub fn resolve(&self, type_name: &str, path: &str) -> Result<TargetPrimitive> {
        self.table.get(type_name).copied().ok_or_else(|| Error::UnsupportedType {
            type_name: type_name.to_string(),
            path: path.to_string(),
        })
    }
}
