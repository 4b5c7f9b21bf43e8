//! Derive a Spark `StructType` schema (JSON) from a mongoose model definition.
//!
//! ```text
//! SchemaSource → SourceTree → SchemaTranslator → Vec<TargetField>
//!     → SchemaDocument → OutputSink
//! ```
pub mod document;
pub mod error;
pub mod ir;
pub mod resolve;
pub mod sink;
pub mod source;
pub mod translate;

pub use document::{DocumentBuilder, SchemaDocument};
pub use error::{Error, Result};
pub use ir::{TargetField, TargetPrimitive, TargetType};
pub use resolve::TypeResolver;
pub use sink::{FileSink, OutputSink, StdoutSink};
pub use source::{JsonModelFile, ModelDefinition, SchemaSource, SourceNode, SourceTree};
pub use translate::SchemaTranslator;

/// Load, translate and assemble, without any output side effect.
pub fn generate_document(source: &dyn SchemaSource) -> Result<SchemaDocument> {
    let model = source.load_model()?;
    tracing::info!(collection = %model.collection_name, "translating model");
    let fields = SchemaTranslator::default().translate_fields(&model.tree, "")?;
    Ok(DocumentBuilder::build(model.collection_name, fields))
}

/// Full run. The sink is only touched once the whole document is rendered.
pub fn export(source: &dyn SchemaSource, sink: &mut dyn OutputSink) -> Result<()> {
    let document = generate_document(source)?;
    let rendered = document.render()?;
    sink.write_document(&rendered)?;
    tracing::info!(
        collection = %document.collection_name,
        bytes = rendered.len(),
        "exported schema"
    );
    Ok(())
}
