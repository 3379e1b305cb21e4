//! Parameterized SQL construction.
//!
//! `build` is deterministic and side-effect free: the same table and
//! operation always produce the same statement. Values are bound through
//! `?` placeholders, one per parameter, and are never concatenated into the
//! SQL text.

use serde_json::Value;

use crate::validate::ValidationError;

use super::operation::{Document, QueryOp};

/// A parameterized SQL statement: text with `?` placeholders plus the bound
/// values in placeholder order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    /// Assemble a statement. The caller is responsible for placeholder and
    /// parameter counts matching; `build` upholds that for every operation.
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameter values, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Build the SQL statement for an operation against a (pre-validated) table.
///
/// Fails with `ValidationError` when the arguments do not match what the
/// operation requires: an empty insert document, a missing `$set` mapping,
/// or an empty filter on a write path.
pub fn build(table: &str, op: &QueryOp) -> Result<Statement, ValidationError> {
    match op {
        QueryOp::Find { filter } => {
            let (clause, params) = where_clause(filter);
            Ok(Statement::new(
                format!("SELECT * FROM {table} WHERE {clause}"),
                params,
            ))
        }
        QueryOp::FindOne { filter } => {
            let (clause, params) = where_clause(filter);
            Ok(Statement::new(
                format!("SELECT * FROM {table} WHERE {clause} LIMIT 1"),
                params,
            ))
        }
        QueryOp::InsertOne { document } => {
            if document.is_empty() {
                return Err(ValidationError::invalid_args(
                    "insertOne requires a non-empty document",
                ));
            }
            let columns: Vec<&str> = document.keys().map(String::as_str).collect();
            let placeholders = vec!["?"; columns.len()].join(", ");
            let params: Vec<Value> = document.values().cloned().collect();
            Ok(Statement::new(
                format!(
                    "INSERT INTO {table} ({}) VALUES ({placeholders})",
                    columns.join(", ")
                ),
                params,
            ))
        }
        QueryOp::UpdateOne { filter, set } => {
            if set.is_empty() {
                return Err(ValidationError::invalid_args(
                    "updateOne requires a non-empty $set mapping",
                ));
            }
            if filter.is_empty() {
                return Err(ValidationError::invalid_args(
                    "updateOne requires a non-empty filter",
                ));
            }
            let assignments: Vec<String> =
                set.keys().map(|k| format!("{k} = ?")).collect();
            let (clause, where_params) = where_clause(filter);
            // SET values first, then WHERE values.
            let mut params: Vec<Value> = set.values().cloned().collect();
            params.extend(where_params);
            Ok(Statement::new(
                format!(
                    "UPDATE {table} SET {} WHERE {clause}",
                    assignments.join(", ")
                ),
                params,
            ))
        }
        QueryOp::DeleteOne { filter } | QueryOp::DeleteMany { filter } => {
            // Both delete operations compile to the same unbounded DELETE;
            // single-row semantics rely on the caller filtering by a unique
            // key (DESIGN.md, D1).
            if filter.is_empty() {
                return Err(ValidationError::invalid_args(
                    "delete operations require a non-empty filter",
                ));
            }
            let (clause, params) = where_clause(filter);
            Ok(Statement::new(
                format!("DELETE FROM {table} WHERE {clause}"),
                params,
            ))
        }
        QueryOp::Raw { sql, params } => Ok(Statement::new(sql.clone(), params.clone())),
    }
}

/// Conjunction of `column = ?` terms in the filter's iteration order.
/// Empty filter yields `1=1`, matching all rows.
fn where_clause(filter: &Document) -> (String, Vec<Value>) {
    if filter.is_empty() {
        return ("1=1".to_string(), Vec::new());
    }
    let clause: Vec<String> = filter.keys().map(|k| format!("{k} = ?")).collect();
    let params: Vec<Value> = filter.values().cloned().collect();
    (clause.join(" AND "), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn find_one_builds_select_with_limit() {
        let op = QueryOp::FindOne {
            filter: doc(json!({"discord_id": "42"})),
        };
        let stmt = build("stats", &op).unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM stats WHERE discord_id = ? LIMIT 1"
        );
        assert_eq!(stmt.params(), &[json!("42")]);
    }

    #[test]
    fn find_with_empty_filter_matches_all_rows() {
        let op = QueryOp::Find {
            filter: Document::new(),
        };
        let stmt = build("stats", &op).unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM stats WHERE 1=1");
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn find_joins_filter_terms_with_and() {
        let op = QueryOp::Find {
            filter: doc(json!({"guild_id": "1", "banned": false})),
        };
        let stmt = build("bans", &op).unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM bans WHERE guild_id = ? AND banned = ?"
        );
        assert_eq!(stmt.params(), &[json!("1"), json!(false)]);
    }

    #[test]
    fn update_puts_set_values_before_where_values() {
        let op = QueryOp::UpdateOne {
            filter: doc(json!({"discord_id": "42"})),
            set: doc(json!({"elo": 1500})),
        };
        let stmt = build("stats", &op).unwrap();
        assert_eq!(stmt.sql(), "UPDATE stats SET elo = ? WHERE discord_id = ?");
        assert_eq!(stmt.params(), &[json!(1500), json!("42")]);
    }

    #[test]
    fn update_preserves_key_order_in_both_clauses() {
        let op = QueryOp::UpdateOne {
            filter: doc(json!({"guild_id": "g", "discord_id": "d"})),
            set: doc(json!({"wins": 3, "losses": 1})),
        };
        let stmt = build("stats", &op).unwrap();
        assert_eq!(
            stmt.sql(),
            "UPDATE stats SET wins = ?, losses = ? WHERE guild_id = ? AND discord_id = ?"
        );
        assert_eq!(
            stmt.params(),
            &[json!(3), json!(1), json!("g"), json!("d")]
        );
    }

    #[test]
    fn update_without_set_is_rejected() {
        let op = QueryOp::UpdateOne {
            filter: doc(json!({"discord_id": "42"})),
            set: Document::new(),
        };
        assert!(build("stats", &op).is_err());
    }

    #[test]
    fn insert_builds_column_and_placeholder_lists_in_order() {
        let op = QueryOp::InsertOne {
            document: doc(json!({"discord_id": "42", "elo": 1000, "wins": 0})),
        };
        let stmt = build("stats", &op).unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT INTO stats (discord_id, elo, wins) VALUES (?, ?, ?)"
        );
        assert_eq!(stmt.params(), &[json!("42"), json!(1000), json!(0)]);
    }

    #[test]
    fn insert_with_empty_document_is_rejected() {
        let op = QueryOp::InsertOne {
            document: Document::new(),
        };
        assert!(build("stats", &op).is_err());
    }

    #[test]
    fn delete_one_and_delete_many_build_the_same_statement() {
        let filter = doc(json!({"discord_id": "42"}));
        let one = build(
            "bans",
            &QueryOp::DeleteOne {
                filter: filter.clone(),
            },
        )
        .unwrap();
        let many = build("bans", &QueryOp::DeleteMany { filter }).unwrap();
        assert_eq!(one, many);
        assert_eq!(one.sql(), "DELETE FROM bans WHERE discord_id = ?");
    }

    #[test]
    fn delete_with_empty_filter_is_rejected() {
        // An unfiltered DELETE would wipe the table; refuse it up front.
        let op = QueryOp::DeleteMany {
            filter: Document::new(),
        };
        assert!(build("bans", &op).is_err());
    }

    #[test]
    fn raw_passes_sql_and_params_through_untouched() {
        let op = QueryOp::Raw {
            sql: "SELECT elo FROM stats ORDER BY elo DESC LIMIT 10".to_string(),
            params: vec![],
        };
        let stmt = build("stats", &op).unwrap();
        assert_eq!(stmt.sql(), "SELECT elo FROM stats ORDER BY elo DESC LIMIT 10");
    }

    #[test]
    fn placeholder_count_equals_param_count_for_every_operation() {
        let ops = [
            QueryOp::Find {
                filter: doc(json!({"a": 1, "b": 2})),
            },
            QueryOp::FindOne {
                filter: doc(json!({"a": 1})),
            },
            QueryOp::InsertOne {
                document: doc(json!({"a": 1, "b": 2, "c": 3})),
            },
            QueryOp::UpdateOne {
                filter: doc(json!({"a": 1, "b": 2})),
                set: doc(json!({"c": 3})),
            },
            QueryOp::DeleteOne {
                filter: doc(json!({"a": 1})),
            },
            QueryOp::DeleteMany {
                filter: doc(json!({"a": 1, "b": 2})),
            },
        ];
        for op in &ops {
            let stmt = build("stats", op).unwrap();
            assert_eq!(
                stmt.placeholder_count(),
                stmt.params().len(),
                "mismatch for {}",
                op.name()
            );
        }
    }
}
