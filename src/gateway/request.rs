//! Wire request parsing.
//!
//! The POST /query body is `{table, operation, ...operation fields}`. All
//! fields are optional at the serde layer; `into_parts` enforces presence
//! and shape per operation, so a malformed body becomes a `ValidationError`
//! instead of a deserialization failure.

use serde::Deserialize;
use serde_json::Value;

use crate::statement::{Document, QueryOp};
use crate::validate::{validate_operation, ValidationError};

/// Raw, untyped POST /query body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQueryRequest {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    /// Equality match mapping for find/update/delete operations.
    #[serde(default)]
    pub filter: Option<Value>,
    /// Row to insert, for insertOne.
    #[serde(default)]
    pub document: Option<Value>,
    /// Update description for updateOne; must contain a `$set` mapping.
    #[serde(default)]
    pub update: Option<Value>,
    /// SQL text, for raw.
    #[serde(default)]
    pub sql: Option<String>,
    /// Positional parameters, for raw.
    #[serde(default)]
    pub params: Option<Vec<Value>>,
}

impl RawQueryRequest {
    /// Resolve the raw body into a table name and a typed operation.
    pub fn into_parts(self) -> Result<(String, QueryOp), ValidationError> {
        let table = self.table.ok_or(ValidationError::MissingField("table"))?;
        let operation = self
            .operation
            .ok_or(ValidationError::MissingField("operation"))?;
        validate_operation(&operation)?;

        let op = match operation.as_str() {
            "find" => QueryOp::Find {
                filter: optional_document(self.filter, "filter")?,
            },
            "findOne" => QueryOp::FindOne {
                filter: optional_document(self.filter, "filter")?,
            },
            "insertOne" => QueryOp::InsertOne {
                document: required_document(self.document, "document")?,
            },
            "updateOne" => {
                let filter = required_document(self.filter, "filter")?;
                let update = required_document(self.update, "update")?;
                let set = match update.get("$set") {
                    Some(Value::Object(map)) => map.clone(),
                    Some(_) => {
                        return Err(ValidationError::invalid_args(
                            "updateOne $set must be an object",
                        ))
                    }
                    None => {
                        return Err(ValidationError::invalid_args(
                            "updateOne requires a $set mapping",
                        ))
                    }
                };
                QueryOp::UpdateOne { filter, set }
            }
            "deleteOne" => QueryOp::DeleteOne {
                filter: required_document(self.filter, "filter")?,
            },
            "deleteMany" => QueryOp::DeleteMany {
                filter: required_document(self.filter, "filter")?,
            },
            "raw" => QueryOp::Raw {
                sql: self.sql.ok_or(ValidationError::MissingField("sql"))?,
                params: self.params.unwrap_or_default(),
            },
            // validate_operation already rejected anything else.
            other => return Err(ValidationError::UnknownOperation(other.to_string())),
        };

        Ok((table, op))
    }
}

/// An optional object field; absent means an empty mapping.
fn optional_document(
    value: Option<Value>,
    field: &'static str,
) -> Result<Document, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Document::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ValidationError::invalid_args(format!(
            "{field} must be an object"
        ))),
    }
}

/// A required object field.
fn required_document(
    value: Option<Value>,
    field: &'static str,
) -> Result<Document, ValidationError> {
    match value {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ValidationError::invalid_args(format!(
            "{field} must be an object"
        ))),
        None => Err(ValidationError::MissingField(field)),
    }
}
