//! Remote statement execution.
//!
//! The gateway does not run SQL itself. Built statements are forwarded to a
//! downstream query endpoint over HTTP, and transport outcomes are mapped to
//! the `DbError` taxonomy. The `QueryExecutor` trait is the seam that lets
//! tests substitute a recording executor for the real one.

mod errors;
mod remote;
mod result;

pub use errors::{DbError, DbErrorCode, DbResult};
pub use remote::HttpExecutor;
pub use result::{ExecutorResponse, QueryResult};

use std::future::Future;
use std::pin::Pin;

use crate::statement::Statement;

/// Executes a built statement against the downstream backend.
///
/// Implementations must not retry: insert/update/delete are not idempotent
/// and the gateway carries no deduplication key.
pub trait QueryExecutor: Send + Sync {
    /// Execute the statement and return the downstream response.
    fn execute<'a>(
        &'a self,
        stmt: &'a Statement,
    ) -> Pin<Box<dyn Future<Output = DbResult<ExecutorResponse>> + Send + 'a>>;
}
