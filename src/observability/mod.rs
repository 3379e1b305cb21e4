//! Structured logging for the gateway.

mod logger;

pub use logger::{Logger, Severity};
