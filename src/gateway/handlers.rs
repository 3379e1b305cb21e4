//! HTTP handlers for the gateway endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::executor::QueryResult;
use crate::validate::ValidationError;

use super::errors::GatewayError;
use super::request::RawQueryRequest;
use super::server::GatewayState;

/// Health probe response. Reports only process liveness; it does not vouch
/// for downstream reachability.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_rss_bytes: Option<u64>,
    pub database: DatabaseInfo,
}

#[derive(Debug, Serialize)]
pub struct DatabaseInfo {
    pub url: String,
    pub status: &'static str,
}

/// `GET /` — unauthenticated liveness probe.
pub async fn health(State(state): State<Arc<GatewayState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.started.elapsed().as_secs(),
        memory_rss_bytes: memory_rss_bytes(),
        database: DatabaseInfo {
            url: state.config.downstream_url.clone(),
            status: "configured",
        },
    })
}

/// `GET /query` — the endpoint only accepts POST; answer with a usage
/// example.
pub async fn query_usage() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method Not Allowed",
            "message": "This endpoint only accepts POST requests",
            "example": {
                "method": "POST",
                "headers": {
                    "Content-Type": "application/json",
                    "x-api-key": "your-api-key"
                },
                "body": {
                    "table": "stats",
                    "operation": "findOne",
                    "filter": { "discord_id": "123456789" }
                }
            }
        })),
    )
}

/// `POST /query` — run the validate → build → execute pipeline.
pub async fn run_query(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<Value>,
) -> Result<Json<QueryResult>, GatewayError> {
    // Only object bodies carry a query; arrays and scalars are rejected.
    if !body.is_object() {
        return Err(ValidationError::invalid_args("request body must be a JSON object").into());
    }
    let raw: RawQueryRequest = serde_json::from_value(body)
        .map_err(|e| ValidationError::invalid_args(format!("malformed request body: {e}")))?;

    let result = state.dispatch(raw).await?;
    Ok(Json(result))
}

/// Resident set size in bytes, when the platform exposes it.
#[cfg(target_os = "linux")]
fn memory_rss_bytes() -> Option<u64> {
    // /proc/self/statm reports pages; assume 4 KiB pages.
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let rss_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(rss_pages * 4096)
}

#[cfg(not(target_os = "linux"))]
fn memory_rss_bytes() -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_example_names_the_wire_fields() {
        let (status, Json(body)) = futures_block_on(query_usage());
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["example"]["body"]["operation"], "findOne");
        assert!(body["example"]["headers"]["x-api-key"].is_string());
    }

    // Minimal executor-free block_on for a handler that never awaits.
    fn futures_block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
