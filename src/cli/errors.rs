//! CLI errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::DbError;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Failure while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
