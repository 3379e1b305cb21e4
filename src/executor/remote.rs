//! HTTP executor for the downstream query endpoint.
//!
//! Forwards `{sql, params}` to the configured URL with an API-key header and
//! a fixed 5-second timeout. No retries: a failed call surfaces immediately.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::json;

use crate::observability::Logger;
use crate::statement::{sanitize_params, Statement};

use super::errors::{DbError, DbResult};
use super::result::ExecutorResponse;
use super::QueryExecutor;

/// Upper bound on a single downstream call.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Executor that forwards statements to a remote HTTP query endpoint.
pub struct HttpExecutor {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpExecutor {
    /// Build an executor for the given downstream endpoint.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> DbResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .build()
            .map_err(|e| DbError::unknown_error(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    /// The configured downstream URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Startup connectivity probe: run `SELECT 1` against the downstream
    /// endpoint.
    pub async fn ping(&self) -> DbResult<()> {
        let probe = Statement::new("SELECT 1", vec![]);
        self.send(&probe)
            .await
            .map(|_| ())
            .map_err(|e| DbError::init_error(format!("downstream probe failed: {e}")))
    }

    async fn send(&self, stmt: &Statement) -> DbResult<ExecutorResponse> {
        // Hardening only; placeholder binding is the actual defense.
        let params = sanitize_params(stmt.params());

        let response = self
            .client
            .post(&self.url)
            .header("X-API-Key", &self.api_key)
            .json(&json!({ "sql": stmt.sql(), "params": params }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // Downstream body is logged but never surfaced to callers.
            let body = response.text().await.unwrap_or_default();
            Logger::error(
                "DOWNSTREAM_ERROR",
                &[
                    ("status", status.as_str()),
                    ("body", body.as_str()),
                ],
            );
            return Err(DbError::api_error(status.as_u16()));
        }

        response
            .json::<ExecutorResponse>()
            .await
            .map_err(|e| DbError::query_error(format!("malformed downstream response: {e}")))
    }
}

impl QueryExecutor for HttpExecutor {
    fn execute<'a>(
        &'a self,
        stmt: &'a Statement,
    ) -> Pin<Box<dyn Future<Output = DbResult<ExecutorResponse>> + Send + 'a>> {
        Box::pin(self.send(stmt))
    }
}

/// Map a transport failure onto the error taxonomy: timeout or connection
/// failure means no response was received (`NETWORK_ERROR`); anything else
/// while building or sending the request is `UNKNOWN_ERROR`.
fn classify_transport_error(err: reqwest::Error) -> DbError {
    if err.is_timeout() || err.is_connect() {
        DbError::network_error()
    } else {
        DbError::unknown_error(format!("request failed: {err}"))
    }
}
