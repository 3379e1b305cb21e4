//! statgate - HTTP gateway translating generic CRUD operations into
//! parameterized SQL for a remote stats backend.
//!
//! Pipeline: validate identifiers → build a parameterized statement →
//! forward it downstream → shape the result per operation.

pub mod cli;
pub mod client;
pub mod config;
pub mod executor;
pub mod gateway;
pub mod observability;
pub mod statement;
pub mod validate;
