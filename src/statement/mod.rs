//! Statement construction.
//!
//! Translates a logical operation plus its arguments into a parameterized
//! SQL statement. All values travel as `?` placeholders; identifiers come
//! only from the whitelist checked upstream, never from free-form input.

mod builder;
mod operation;
mod sanitize;

pub use builder::{build, Statement};
pub use operation::{Document, QueryOp};
pub use sanitize::{sanitize, sanitize_params};
