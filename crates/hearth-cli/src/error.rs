//! Error handling for the Hearth CLI

use thiserror::Error;

use crate::config::ConfigError;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Hearth error: {0}")]
    Hearth(#[from] hearth_core::HearthError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Unknown fixture user: {0}")]
    UnknownUser(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Runtime(err.to_string())
    }
}
