//! Per-request access logging.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::observability::Logger;

/// Middleware logging one structured line per completed request: method,
/// path, status, latency and a generated request id.
pub async fn record(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    let latency_ms = started.elapsed().as_millis().to_string();
    Logger::info(
        "HTTP_REQUEST",
        &[
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("status", status.as_str()),
            ("latency_ms", latency_ms.as_str()),
            ("request_id", request_id.as_str()),
        ],
    );

    response
}
