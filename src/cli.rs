//! CLI command implementations for Columbus.

pub(crate) mod peek;
pub(crate) mod play;

mod keys;
mod view;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Output format for the `peek` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PeekFormat {
    /// ASCII grid with a legend.
    Text,
    /// The snapshot in the server's JSON format.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<columbus::TransportError> for CliError {
    fn from(e: columbus::TransportError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Logs go to `log_file` when
/// given, otherwise to stderr.
pub(crate) fn init_logging(log_file: Option<&Path>, default_directive: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::new(format!("Failed to create {}: {e}", path.display()))
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed.map_err(|e| CliError::new(format!("Failed to install logger: {e}")))
}
