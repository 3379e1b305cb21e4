//! Configuration errors.

use thiserror::Error;

/// Startup configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The shared secret is absent or empty.
    #[error("API_KEY environment variable is required")]
    MissingApiKey,

    /// PORT was set but is not a valid port number.
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}
