//! Shared-secret authentication.
//!
//! A single static `x-api-key` header compared in constant time. Missing and
//! invalid keys produce the identical 401 body so the response carries no
//! key-guessing signal; the distinction survives only in the log.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::observability::Logger;

use super::errors::error_response;
use super::server::GatewayState;

/// Outcome of the key check. Only `Valid` lets a request through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCheck {
    Valid,
    Missing,
    Invalid,
}

impl KeyCheck {
    fn reason(self) -> &'static str {
        match self {
            KeyCheck::Valid => "valid",
            KeyCheck::Missing => "missing_key",
            KeyCheck::Invalid => "invalid_key",
        }
    }
}

/// Compare the presented `x-api-key` header against the expected secret.
pub fn check_api_key(headers: &HeaderMap, expected: &str) -> KeyCheck {
    let presented = match headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        Some(value) if !value.is_empty() => value,
        _ => return KeyCheck::Missing,
    };
    if presented.as_bytes().ct_eq(expected.as_bytes()).into() {
        KeyCheck::Valid
    } else {
        KeyCheck::Invalid
    }
}

/// Middleware guarding the query endpoints.
pub async fn require_api_key(
    State(state): State<Arc<GatewayState>>,
    req: Request,
    next: Next,
) -> Response {
    match check_api_key(req.headers(), &state.config.api_key) {
        KeyCheck::Valid => next.run(req).await,
        outcome => {
            Logger::warn(
                "AUTH_FAILED",
                &[
                    ("reason", outcome.reason()),
                    ("path", req.uri().path()),
                ],
            );
            unauthorized()
        }
    }
}

/// The one 401 body for every auth failure.
fn unauthorized() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "Unauthorized",
        "Missing or invalid API key",
    )
}
