//! Downstream error taxonomy.
//!
//! Everything that goes wrong past validation is a `DbError` with an
//! internal code. The gateway surfaces the code but never the raw
//! downstream body; downstream detail goes to the log only.

use std::fmt;

use thiserror::Error;

/// Result type for executor operations.
pub type DbResult<T> = Result<T, DbError>;

/// Internal error codes for downstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// Downstream responded with an error status.
    ApiError,
    /// No response: connection failure or timeout.
    NetworkError,
    /// Startup connectivity probe failed.
    InitError,
    /// Downstream accepted the query but returned an unusable body.
    QueryError,
    /// Anything else while constructing or sending the request.
    UnknownError,
}

impl DbErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            DbErrorCode::ApiError => "API_ERROR",
            DbErrorCode::NetworkError => "NETWORK_ERROR",
            DbErrorCode::InitError => "INIT_ERROR",
            DbErrorCode::QueryError => "QUERY_ERROR",
            DbErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for DbErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A downstream-caused failure.
#[derive(Debug, Clone, Error)]
#[error("{message} [{code}]")]
pub struct DbError {
    /// Internal code, safe to surface to clients.
    pub code: DbErrorCode,
    /// Internal message; the gateway replaces it with a generic one in
    /// HTTP responses.
    pub message: String,
    /// Downstream HTTP status, when a response was received.
    pub status: Option<u16>,
}

impl DbError {
    /// Downstream responded with an error status.
    pub fn api_error(status: u16) -> Self {
        Self {
            code: DbErrorCode::ApiError,
            message: format!("Database operation failed (downstream status {status})"),
            status: Some(status),
        }
    }

    /// Connection failure or timeout; no response received.
    pub fn network_error() -> Self {
        Self {
            code: DbErrorCode::NetworkError,
            message: "Database connection failed".to_string(),
            status: None,
        }
    }

    /// Startup connectivity probe failed.
    pub fn init_error(msg: impl Into<String>) -> Self {
        Self {
            code: DbErrorCode::InitError,
            message: msg.into(),
            status: None,
        }
    }

    /// Downstream accepted the query but returned an unusable body.
    pub fn query_error(msg: impl Into<String>) -> Self {
        Self {
            code: DbErrorCode::QueryError,
            message: msg.into(),
            status: None,
        }
    }

    /// Any other failure while constructing or sending the request.
    pub fn unknown_error(msg: impl Into<String>) -> Self {
        Self {
            code: DbErrorCode::UnknownError,
            message: msg.into(),
            status: None,
        }
    }
}
