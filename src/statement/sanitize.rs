//! Parameter value sanitization.
//!
//! Strips quote and statement-separator characters from string values as a
//! hardening layer over placeholder binding. The safety guarantee comes from
//! the placeholders; this layer is strictly secondary and MUST only ever run
//! on bound values, never on table or column identifiers.

use serde_json::Value;

/// Strip `'`, `"` and `;` from string values. Non-string values pass
/// through unchanged.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(
            s.chars()
                .filter(|c| !matches!(c, '\'' | '"' | ';'))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Sanitize every parameter in a bound-value list.
pub fn sanitize_params(params: &[Value]) -> Vec<Value> {
    params.iter().map(sanitize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_quotes_and_semicolons_from_strings() {
        assert_eq!(
            sanitize(&json!("a'b\"c;d")),
            json!("abcd")
        );
        assert_eq!(
            sanitize(&json!("'; DROP TABLE stats; --")),
            json!(" DROP TABLE stats --")
        );
    }

    #[test]
    fn clean_strings_are_unchanged() {
        assert_eq!(sanitize(&json!("player_42")), json!("player_42"));
    }

    #[test]
    fn non_strings_pass_through() {
        assert_eq!(sanitize(&json!(1500)), json!(1500));
        assert_eq!(sanitize(&json!(true)), json!(true));
        assert_eq!(sanitize(&Value::Null), Value::Null);
        assert_eq!(sanitize(&json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn sanitizes_each_param_in_a_list() {
        let params = vec![json!("it's"), json!(7), json!("ok")];
        assert_eq!(
            sanitize_params(&params),
            vec![json!("its"), json!(7), json!("ok")]
        );
    }
}
