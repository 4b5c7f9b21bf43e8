//! Where the rendered document goes.
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub trait OutputSink {
    /// Called once per run with the complete document.
    fn write_document(&mut self, document: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_document(&mut self, document: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{document}")
            .and_then(|()| stdout.flush())
            .map_err(|source| Error::Output { destination: "stdout".to_string(), source })
    }
}

#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn output_error(&self, source: std::io::Error) -> Error {
        Error::Output { destination: self.path.display().to_string(), source }
    }
}

impl OutputSink for FileSink {
    fn write_document(&mut self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.output_error(e))?;
        }
        std::fs::write(&self.path, document).map_err(|e| self.output_error(e))?;
        tracing::info!(path = %self.path.display(), bytes = document.len(), "wrote schema");
        Ok(())
    }
}
