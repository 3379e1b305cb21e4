//! HTTP gateway service.
//!
//! Exposes the validate → build → execute pipeline over a single
//! authenticated POST endpoint, plus a health probe. Cross-cutting layers:
//! rate limiting, payload ceiling, security headers, CORS and access
//! logging.

mod access_log;
mod auth;
mod errors;
mod handlers;
mod rate_limit;
mod request;
mod server;

pub use auth::{check_api_key, KeyCheck};
pub use errors::{ErrorBody, GatewayError, GatewayResult};
pub use rate_limit::RateLimiter;
pub use request::RawQueryRequest;
pub use server::{GatewayServer, GatewayState};
