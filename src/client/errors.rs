//! Client-side errors.

use thiserror::Error;

/// Failure while talking to the gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway answered with an error envelope.
    #[error("gateway error {status}: {message}")]
    Gateway { status: u16, message: String },

    /// The gateway could not be reached, or the response could not be
    /// decoded.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
