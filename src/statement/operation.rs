//! Logical operations accepted by the gateway.
//!
//! One variant per wire operation, each carrying exactly the arguments that
//! operation needs. The statement builder matches on this exhaustively, so
//! an operation with malformed arguments cannot reach SQL construction.

use serde_json::{Map, Value};

/// An ordered column → value mapping. `serde_json`'s `preserve_order`
/// feature keeps iteration in the JSON body's key order, which fixes the
/// order of SQL clauses and bound parameters.
pub type Document = Map<String, Value>;

/// A parsed, typed gateway operation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOp {
    /// Select all rows matching an equality filter. Empty filter matches
    /// every row.
    Find { filter: Document },
    /// Like `Find`, limited to the first matching row.
    FindOne { filter: Document },
    /// Insert a single row.
    InsertOne { document: Document },
    /// Update rows matching `filter`, assigning the columns in `set`
    /// (taken from the request's `$set` mapping).
    UpdateOne { filter: Document, set: Document },
    /// Delete rows matching an equality filter.
    DeleteOne { filter: Document },
    /// Delete rows matching an equality filter. Compiles to the same
    /// statement as `DeleteOne`; see DESIGN.md.
    DeleteMany { filter: Document },
    /// Caller-supplied SQL text and positional parameters, passed through
    /// untouched. Gated behind a separate trust boundary at the gateway.
    Raw { sql: String, params: Vec<Value> },
}

impl QueryOp {
    /// Wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            QueryOp::Find { .. } => "find",
            QueryOp::FindOne { .. } => "findOne",
            QueryOp::InsertOne { .. } => "insertOne",
            QueryOp::UpdateOne { .. } => "updateOne",
            QueryOp::DeleteOne { .. } => "deleteOne",
            QueryOp::DeleteMany { .. } => "deleteMany",
            QueryOp::Raw { .. } => "raw",
        }
    }

    /// Returns true for the `raw` escape hatch.
    pub fn is_raw(&self) -> bool {
        matches!(self, QueryOp::Raw { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{validate_operation, OPERATIONS};

    #[test]
    fn names_match_the_operation_set() {
        let ops = [
            QueryOp::Find {
                filter: Document::new(),
            },
            QueryOp::FindOne {
                filter: Document::new(),
            },
            QueryOp::InsertOne {
                document: Document::new(),
            },
            QueryOp::UpdateOne {
                filter: Document::new(),
                set: Document::new(),
            },
            QueryOp::DeleteOne {
                filter: Document::new(),
            },
            QueryOp::DeleteMany {
                filter: Document::new(),
            },
            QueryOp::Raw {
                sql: String::new(),
                params: Vec::new(),
            },
        ];
        assert_eq!(ops.len(), OPERATIONS.len());
        for op in &ops {
            assert!(validate_operation(op.name()).is_ok());
        }
    }

    #[test]
    fn only_raw_is_raw() {
        let raw = QueryOp::Raw {
            sql: "SELECT 1".to_string(),
            params: Vec::new(),
        };
        assert!(raw.is_raw());
        let find = QueryOp::Find {
            filter: Document::new(),
        };
        assert!(!find.is_raw());
    }
}
