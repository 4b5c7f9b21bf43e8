use std::path::PathBuf;

use serde_json::Value;

/// Everything that can abort a translation run.
///
/// None of these are recoverable: the translation is a pure function of the
/// model, so the only fix is to edit the model and run again.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not load model from {}: {reason}", .path.display())]
    SourceLoad { path: PathBuf, reason: String },

    #[error("mongoose type `{type_name}` (at model path `{path}`) is not supported yet")]
    UnsupportedType { type_name: String, path: String },

    #[error("could not parse model due to {}", render_field(.path, .value))]
    UnparseableField { path: String, value: Value },

    #[error("failed to render schema document: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to write schema to {destination}: {source}")]
    Output {
        destination: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn source_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::SourceLoad { path: path.into(), reason: reason.to_string() }
    }
}

// `{ "<path>": <value> }`, pretty-printed, so the offending field reads the
// same way it was declared.
fn render_field(path: &str, value: &Value) -> String {
    let mut wrapper = serde_json::Map::new();
    wrapper.insert(path.to_string(), value.clone());
    crate::document::to_pretty_string(&Value::Object(wrapper))
        .unwrap_or_else(|_| format!("{{{path:?}: {value}}}"))
}
