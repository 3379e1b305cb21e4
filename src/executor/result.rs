//! Downstream response and client-facing result shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::statement::QueryOp;

/// The response body shape of the downstream query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorResponse {
    /// Rows, for SELECT-like statements.
    #[serde(default)]
    pub results: Option<Vec<Value>>,
    /// Affected row count, for writes.
    #[serde(default)]
    pub affected_rows: Option<u64>,
    /// Generated key, for inserts.
    #[serde(default)]
    pub last_insert_id: Option<Value>,
}

/// Operation-specific result returned to gateway clients.
///
/// Serialized untagged: each variant is exactly the JSON shape the original
/// contract promises for its operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Row list for `find` and `raw`.
    Rows(Vec<Value>),
    /// `{modifiedCount}` for `updateOne`.
    Updated {
        #[serde(rename = "modifiedCount")]
        modified_count: u64,
    },
    /// `{insertId}` for `insertOne`.
    Inserted {
        #[serde(rename = "insertId")]
        insert_id: Value,
    },
    /// `{deletedCount}` for `deleteOne`/`deleteMany`.
    Deleted {
        #[serde(rename = "deletedCount")]
        deleted_count: u64,
    },
    /// First row or null for `findOne`.
    Row(Option<Value>),
}

impl QueryResult {
    /// Shape a downstream response according to the operation that
    /// produced it.
    pub fn shape(op: &QueryOp, response: ExecutorResponse) -> Self {
        match op {
            QueryOp::Find { .. } | QueryOp::Raw { .. } => {
                QueryResult::Rows(response.results.unwrap_or_default())
            }
            QueryOp::FindOne { .. } => QueryResult::Row(
                response
                    .results
                    .unwrap_or_default()
                    .into_iter()
                    .next(),
            ),
            QueryOp::UpdateOne { .. } => QueryResult::Updated {
                modified_count: response.affected_rows.unwrap_or(0),
            },
            QueryOp::InsertOne { .. } => QueryResult::Inserted {
                insert_id: response.last_insert_id.unwrap_or(Value::Null),
            },
            QueryOp::DeleteOne { .. } | QueryOp::DeleteMany { .. } => QueryResult::Deleted {
                deleted_count: response.affected_rows.unwrap_or(0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Document;
    use serde_json::json;

    fn response(results: Value) -> ExecutorResponse {
        ExecutorResponse {
            results: Some(results.as_array().unwrap().clone()),
            affected_rows: None,
            last_insert_id: None,
        }
    }

    #[test]
    fn downstream_response_parses_camel_case_fields() {
        let resp: ExecutorResponse = serde_json::from_value(json!({
            "results": [{"discord_id": "42"}],
            "affectedRows": 2,
            "lastInsertId": 7
        }))
        .unwrap();
        assert_eq!(resp.results.unwrap().len(), 1);
        assert_eq!(resp.affected_rows, Some(2));
        assert_eq!(resp.last_insert_id, Some(json!(7)));
    }

    #[test]
    fn downstream_response_fields_are_all_optional() {
        let resp: ExecutorResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.results.is_none());
        assert!(resp.affected_rows.is_none());
        assert!(resp.last_insert_id.is_none());
    }

    #[test]
    fn find_shapes_to_row_list() {
        let op = QueryOp::Find {
            filter: Document::new(),
        };
        let result = QueryResult::shape(&op, response(json!([{"a": 1}, {"a": 2}])));
        assert_eq!(result, QueryResult::Rows(vec![json!({"a": 1}), json!({"a": 2})]));
    }

    #[test]
    fn find_one_takes_the_first_row_or_null() {
        let op = QueryOp::FindOne {
            filter: Document::new(),
        };
        let result = QueryResult::shape(&op, response(json!([{"a": 1}, {"a": 2}])));
        assert_eq!(result, QueryResult::Row(Some(json!({"a": 1}))));

        let empty = QueryResult::shape(&op, response(json!([])));
        assert_eq!(empty, QueryResult::Row(None));
        assert_eq!(serde_json::to_value(&empty).unwrap(), Value::Null);
    }

    #[test]
    fn write_operations_shape_to_their_count_envelopes() {
        let resp = ExecutorResponse {
            results: None,
            affected_rows: Some(3),
            last_insert_id: Some(json!(99)),
        };

        let updated = QueryResult::shape(
            &QueryOp::UpdateOne {
                filter: Document::new(),
                set: Document::new(),
            },
            resp.clone(),
        );
        assert_eq!(
            serde_json::to_value(&updated).unwrap(),
            json!({"modifiedCount": 3})
        );

        let inserted = QueryResult::shape(
            &QueryOp::InsertOne {
                document: Document::new(),
            },
            resp.clone(),
        );
        assert_eq!(
            serde_json::to_value(&inserted).unwrap(),
            json!({"insertId": 99})
        );

        let deleted = QueryResult::shape(
            &QueryOp::DeleteMany {
                filter: Document::new(),
            },
            resp,
        );
        assert_eq!(
            serde_json::to_value(&deleted).unwrap(),
            json!({"deletedCount": 3})
        );
    }

    #[test]
    fn missing_downstream_fields_default_to_empty_results() {
        let op = QueryOp::Raw {
            sql: "SELECT 1".to_string(),
            params: vec![],
        };
        let result = QueryResult::shape(&op, ExecutorResponse::default());
        assert_eq!(result, QueryResult::Rows(vec![]));
    }
}
