//! Minimal CLI: model definition → Spark schema JSON
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mongoose_spark_schema::{Error, FileSink, JsonModelFile, OutputSink, StdoutSink};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate a Spark StructType schema (JSON) from a mongoose model definition
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    /// model definition file (.json)
    #[arg(long, value_name = "PATH")]
    model: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// log progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// log every translated field to stderr
    #[arg(long)]
    debug: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// `RUST_LOG` wins over the flags. Logs go to stderr; stdout is the document.
    pub fn init_logging(&self) {
        let level = if self.debug {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        };
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(format!("mongoose_spark_schema={level}"))
                }),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let source = JsonModelFile::new(&self.model);
        let mut sink: Box<dyn OutputSink> = match self.output.as_ref() {
            Some(out) => Box::new(FileSink::new(out)),
            None => Box::new(StdoutSink),
        };
        mongoose_spark_schema::export(&source, sink.as_mut()).map_err(|error| self.diagnose(error))
    }

    fn diagnose(&self, error: Error) -> anyhow::Error {
        let model = self.model.display();
        match error {
            Error::SourceLoad { .. } => {
                anyhow!("{error}. Check that --model points to a model definition file and re-run.")
            }
            Error::UnsupportedType { .. } | Error::UnparseableField { .. } => {
                anyhow!("{error}. Manually fix such fields in {model} and re-run.")
            }
            other => anyhow::Error::new(other),
        }
    }
}
