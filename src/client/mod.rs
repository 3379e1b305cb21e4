//! Typed client for the gateway.
//!
//! The surface collaborators (the bot process, jobs) use instead of
//! constructing SQL or HTTP bodies themselves: one method per operation,
//! each performing the authenticated POST /query call and decoding the
//! operation's result shape.

mod errors;

pub use errors::ClientError;

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::statement::Document;

/// Client-side timeout; a little above the gateway's own downstream bound.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a running gateway.
pub struct GatewayClient {
    http: reqwest::Client,
    query_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UpdatedBody {
    #[serde(rename = "modifiedCount")]
    modified_count: u64,
}

#[derive(Debug, Deserialize)]
struct InsertedBody {
    #[serde(rename = "insertId")]
    insert_id: Value,
}

#[derive(Debug, Deserialize)]
struct DeletedBody {
    #[serde(rename = "deletedCount")]
    deleted_count: u64,
}

impl GatewayClient {
    /// Build a client for a gateway at `base_url` (no trailing slash
    /// needed).
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            query_url: format!("{}/query", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    /// All rows matching an equality filter.
    pub async fn find(&self, table: &str, filter: Document) -> Result<Vec<Value>, ClientError> {
        let body = json!({ "table": table, "operation": "find", "filter": filter });
        Ok(self.post(body).await?.json().await?)
    }

    /// The first row matching an equality filter, if any.
    pub async fn find_one(
        &self,
        table: &str,
        filter: Document,
    ) -> Result<Option<Value>, ClientError> {
        let body = json!({ "table": table, "operation": "findOne", "filter": filter });
        Ok(self.post(body).await?.json().await?)
    }

    /// Insert a row; returns the generated key.
    pub async fn insert_one(&self, table: &str, document: Document) -> Result<Value, ClientError> {
        let body = json!({ "table": table, "operation": "insertOne", "document": document });
        let inserted: InsertedBody = self.post(body).await?.json().await?;
        Ok(inserted.insert_id)
    }

    /// Update matching rows; returns the modified-row count.
    pub async fn update_one(
        &self,
        table: &str,
        filter: Document,
        set: Document,
    ) -> Result<u64, ClientError> {
        let body = json!({
            "table": table,
            "operation": "updateOne",
            "filter": filter,
            "update": { "$set": set }
        });
        let updated: UpdatedBody = self.post(body).await?.json().await?;
        Ok(updated.modified_count)
    }

    /// Delete by unique-key filter; returns the deleted-row count.
    pub async fn delete_one(&self, table: &str, filter: Document) -> Result<u64, ClientError> {
        self.delete(table, "deleteOne", filter).await
    }

    /// Delete all matching rows; returns the deleted-row count.
    pub async fn delete_many(&self, table: &str, filter: Document) -> Result<u64, ClientError> {
        self.delete(table, "deleteMany", filter).await
    }

    /// Raw SQL passthrough. Only works against a gateway with the escape
    /// hatch enabled.
    pub async fn raw(
        &self,
        table: &str,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<Value>, ClientError> {
        let body = json!({ "table": table, "operation": "raw", "sql": sql, "params": params });
        Ok(self.post(body).await?.json().await?)
    }

    async fn delete(
        &self,
        table: &str,
        operation: &str,
        filter: Document,
    ) -> Result<u64, ClientError> {
        let body = json!({ "table": table, "operation": operation, "filter": filter });
        let deleted: DeletedBody = self.post(body).await?.json().await?;
        Ok(deleted.deleted_count)
    }

    async fn post(&self, body: Value) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .post(&self.query_url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<crate::gateway::ErrorBody>().await {
            Ok(envelope) => envelope.message,
            Err(_) => status.to_string(),
        };
        Err(ClientError::Gateway {
            status: status.as_u16(),
            message,
        })
    }
}
