//! Identifier validation for the gateway.
//!
//! Table names and operation names are checked against fixed sets before any
//! SQL text is built or any downstream call is made. This is the primary
//! injection defense: untrusted identifiers never reach the statement
//! builder.

mod errors;

pub use errors::ValidationError;

use std::collections::HashSet;

/// The closed set of supported operations. Fixed at compile time; anything
/// outside it is rejected before statement construction.
pub const OPERATIONS: [&str; 7] = [
    "find",
    "findOne",
    "insertOne",
    "updateOne",
    "deleteOne",
    "deleteMany",
    "raw",
];

/// Validate an operation name against the fixed operation set.
pub fn validate_operation(name: &str) -> Result<(), ValidationError> {
    if OPERATIONS.contains(&name) {
        Ok(())
    } else {
        Err(ValidationError::UnknownOperation(name.to_string()))
    }
}

/// Table whitelist, decided once at startup and passed into the gateway at
/// construction rather than held as module-level global state.
#[derive(Debug, Clone)]
pub struct Whitelist {
    tables: HashSet<String>,
}

impl Whitelist {
    /// Build a whitelist from an explicit table list.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate a table name against the whitelist.
    pub fn validate_table(&self, name: &str) -> Result<(), ValidationError> {
        if self.tables.contains(name) {
            Ok(())
        } else {
            Err(ValidationError::UnknownTable(name.to_string()))
        }
    }

    /// Returns the number of whitelisted tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no tables are whitelisted.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
