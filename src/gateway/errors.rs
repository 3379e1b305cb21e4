//! Gateway error type and HTTP error envelope.
//!
//! Two error kinds cross the boundary: validation failures (client-caused,
//! 400, carry the offending detail) and database failures (downstream-caused,
//! 500, generic message plus an internal code, never the raw downstream
//! body). A disabled `raw` escape hatch is the one 403.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::DbError;
use crate::validate::ValidationError;

/// Result type for gateway handlers.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the query pipeline.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Client-caused: unknown identifiers, malformed or missing arguments.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Downstream-caused failure with an internal code.
    #[error("{0}")]
    Database(#[from] DbError),

    /// `raw` was requested but the escape hatch is disabled.
    #[error("The raw operation is disabled on this gateway")]
    RawDisabled,
}

impl GatewayError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::RawDisabled => StatusCode::FORBIDDEN,
            GatewayError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error envelope returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Validation(e) => ErrorBody::new("Validation Error", e.to_string()),
            GatewayError::Database(e) => {
                // Generic message; the code is safe, downstream detail is not.
                ErrorBody::new(
                    "Database Error",
                    "An error occurred while processing your request",
                )
                .with_code(e.code.as_str())
            }
            GatewayError::RawDisabled => ErrorBody::new("Forbidden", err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody::from(&self);
        (status, Json(body)).into_response()
    }
}

/// Build a JSON error response outside the handler pipeline (middleware
/// rejections: auth and rate limiting).
pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(ErrorBody::new(error, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::DbErrorCode;

    #[test]
    fn validation_errors_map_to_400_with_detail() {
        let err = GatewayError::from(ValidationError::UnknownTable("foo".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, "Validation Error");
        assert!(body.message.contains("foo"));
        assert!(body.code.is_none());
    }

    #[test]
    fn database_errors_map_to_500_with_code_but_generic_message() {
        let err = GatewayError::from(DbError::api_error(502));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, "Database Error");
        assert_eq!(body.code.as_deref(), Some(DbErrorCode::ApiError.as_str()));
        // The downstream status/body must not leak.
        assert!(!body.message.contains("502"));
    }

    #[test]
    fn raw_disabled_maps_to_403() {
        assert_eq!(GatewayError::RawDisabled.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn query_errors_surface_their_code_only() {
        let err = GatewayError::from(DbError::query_error("garbled body"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody::from(&err);
        assert_eq!(body.code.as_deref(), Some(DbErrorCode::QueryError.as_str()));
        assert!(!body.message.contains("garbled"));
    }
}
