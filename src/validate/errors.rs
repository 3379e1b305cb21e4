//! Validation error type.
//!
//! Raised for client-caused problems: unknown identifiers, malformed or
//! missing arguments. Always surfaces as HTTP 400 at the gateway boundary.

use thiserror::Error;

/// A client-caused validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Table name is not in the whitelist.
    #[error("Invalid table name: {0}")]
    UnknownTable(String),

    /// Operation name is not in the fixed operation set.
    #[error("Invalid operation: {0}")]
    UnknownOperation(String),

    /// A required request field is absent.
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),

    /// Arguments are present but do not match the operation's shape.
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl ValidationError {
    /// Shorthand for an argument-shape failure.
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = ValidationError::UnknownTable("foo".to_string());
        assert_eq!(err.to_string(), "Invalid table name: foo");

        let err = ValidationError::UnknownOperation("upsert".to_string());
        assert_eq!(err.to_string(), "Invalid operation: upsert");

        let err = ValidationError::MissingField("table");
        assert_eq!(err.to_string(), "Missing required parameter: table");
    }
}
