//! Parameter coercion — free-form strings into schema-typed JSON values.
//!
//! `coerce` is total: every input string yields *some* value, never an error.
//! Malformed structured input degrades to the original string rather than
//! failing the whole invocation, so the remote tool sees the user's text
//! verbatim and can produce its own diagnostic.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::catalog::ParameterSpec;

/// Convert raw string parameters into typed values, guided by the tool's
/// parameter specs where a declared type is known.
///
/// Blank values are omitted entirely (an empty optional field is "not
/// provided", not an empty string argument).
pub fn coerce(raw_params: &HashMap<String, String>, specs: &[ParameterSpec]) -> Map<String, Value> {
    let mut out = Map::new();
    for (name, raw) in raw_params {
        if raw.trim().is_empty() {
            continue;
        }
        let declared = specs
            .iter()
            .find(|s| s.name == *name)
            .and_then(|s| s.declared_type.as_deref());
        out.insert(name.clone(), coerce_value(raw, declared));
    }
    out
}

/// Coerce a single raw string by declared type, or by content inference when
/// the type is unknown.
pub fn coerce_value(raw: &str, declared_type: Option<&str>) -> Value {
    match declared_type.map(str::to_lowercase).as_deref() {
        Some("integer") => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        Some("boolean") => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Value::Bool(true),
            "false" | "no" | "0" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        Some("array") => serde_json::from_str(raw).unwrap_or_else(|_| {
            // Fallback to comma-separated tokens
            Value::Array(
                raw.split(',')
                    .map(|item| Value::String(item.trim().to_string()))
                    .collect(),
            )
        }),
        Some("object") => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        Some("string") => Value::String(raw.to_string()),
        _ => infer_value(raw),
    }
}

/// Content-based inference for parameters with no usable declared type:
/// boolean literal, integer, float, bracket-delimited structure, else string.
fn infer_value(raw: &str) -> Value {
    let lower = raw.to_lowercase();
    if lower == "true" || lower == "false" {
        return Value::Bool(lower == "true");
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(num) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(num);
    }
    if (raw.starts_with('[') && raw.ends_with(']'))
        || (raw.starts_with('{') && raw.ends_with('}'))
    {
        return serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    }
    Value::String(raw.to_string())
}

/// Check that every required field has a non-blank raw value.
///
/// Returns one human-readable message per violation, in required-list order;
/// an empty vector means valid. Runs before coercion and short-circuits the
/// invocation on any violation.
pub fn validate_required(
    raw_params: &HashMap<String, String>,
    required_names: &[String],
) -> Vec<String> {
    required_names
        .iter()
        .filter(|name| {
            raw_params
                .get(*name)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|name| format!("Required parameter '{name}' is missing"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(name: &str, declared: &str) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            declared_type: Some(declared.to_string()),
            description: None,
            required: false,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn declared_integer_parses_or_falls_back() {
        assert_eq!(coerce_value("5", Some("integer")), Value::from(5));
        assert_eq!(
            coerce_value("abc", Some("integer")),
            Value::String("abc".to_string())
        );
    }

    #[test]
    fn declared_number_parses_or_falls_back() {
        assert_eq!(coerce_value("2.5", Some("number")), Value::from(2.5));
        assert_eq!(
            coerce_value("nope", Some("number")),
            Value::String("nope".to_string())
        );
        // parses as f64 but has no JSON representation
        assert_eq!(
            coerce_value("NaN", Some("number")),
            Value::String("NaN".to_string())
        );
    }

    #[test]
    fn declared_boolean_accepts_yes_no_digits() {
        assert_eq!(coerce_value("TRUE", Some("boolean")), Value::Bool(true));
        assert_eq!(coerce_value("yes", Some("boolean")), Value::Bool(true));
        assert_eq!(coerce_value("1", Some("boolean")), Value::Bool(true));
        assert_eq!(coerce_value("no", Some("boolean")), Value::Bool(false));
        assert_eq!(coerce_value("0", Some("boolean")), Value::Bool(false));
        assert_eq!(
            coerce_value("maybe", Some("boolean")),
            Value::String("maybe".to_string())
        );
    }

    #[test]
    fn declared_array_falls_back_to_comma_split() {
        assert_eq!(
            coerce_value("[1,2,3]", Some("array")),
            serde_json::json!([1, 2, 3])
        );
        assert_eq!(
            coerce_value("a, b ,c", Some("array")),
            serde_json::json!(["a", "b", "c"])
        );
    }

    #[test]
    fn declared_object_falls_back_to_raw_string() {
        assert_eq!(
            coerce_value(r#"{"k": 1}"#, Some("object")),
            serde_json::json!({"k": 1})
        );
        assert_eq!(
            coerce_value("{broken", Some("object")),
            Value::String("{broken".to_string())
        );
    }

    #[test]
    fn declared_string_passes_through() {
        assert_eq!(
            coerce_value("5", Some("string")),
            Value::String("5".to_string())
        );
    }

    #[test]
    fn inference_order_bool_int_float_structure_string() {
        assert_eq!(coerce_value("true", None), Value::Bool(true));
        assert_eq!(coerce_value("42", None), Value::from(42));
        assert_eq!(coerce_value("3.25", None), Value::from(3.25));
        assert_eq!(coerce_value("[1,2,3]", None), serde_json::json!([1, 2, 3]));
        assert_eq!(
            coerce_value(r#"{"a": true}"#, None),
            serde_json::json!({"a": true})
        );
        assert_eq!(
            coerce_value("plain text", None),
            Value::String("plain text".to_string())
        );
    }

    #[test]
    fn inference_does_not_treat_yes_as_boolean() {
        assert_eq!(coerce_value("yes", None), Value::String("yes".to_string()));
    }

    #[test]
    fn malformed_bracket_literal_degrades_to_string() {
        assert_eq!(
            coerce_value("[1,2", None),
            Value::String("[1,2".to_string())
        );
    }

    #[test]
    fn unknown_declared_type_uses_inference() {
        assert_eq!(coerce_value("7", Some("duration")), Value::from(7));
    }

    #[test]
    fn blank_values_are_omitted() {
        let raw = params(&[("count", "5"), ("note", "   "), ("name", "")]);
        let out = coerce(&raw, &[spec("count", "integer")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out["count"], Value::from(5));
    }

    #[test]
    fn coerce_uses_spec_types_per_name() {
        let raw = params(&[("count", "5"), ("ratio", "0.5"), ("tag", "7")]);
        let specs = vec![
            spec("count", "integer"),
            spec("ratio", "number"),
            spec("tag", "string"),
        ];
        let out = coerce(&raw, &specs);
        assert_eq!(out["count"], Value::from(5));
        assert_eq!(out["ratio"], Value::from(0.5));
        assert_eq!(out["tag"], Value::String("7".to_string()));
    }

    #[test]
    fn validate_required_reports_in_required_order() {
        let raw = params(&[("b", ""), ("c", "ok")]);
        let required = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let messages = validate_required(&raw, &required);
        assert_eq!(
            messages,
            vec![
                "Required parameter 'a' is missing".to_string(),
                "Required parameter 'b' is missing".to_string(),
            ]
        );
    }

    #[test]
    fn validate_required_empty_means_valid() {
        let raw = params(&[("a", "1")]);
        assert!(validate_required(&raw, &["a".to_string()]).is_empty());
        assert!(validate_required(&raw, &[]).is_empty());
    }

    mod totality {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // coerce_value is total for any string and any declared type
            #[test]
            fn never_panics(raw in ".*", declared in prop::option::of("[a-z]{1,8}")) {
                let _ = coerce_value(&raw, declared.as_deref());
            }

            // declared integer: either a parsed integer or the raw string unchanged
            #[test]
            fn integer_round_trips_or_preserves(raw in ".*") {
                match coerce_value(&raw, Some("integer")) {
                    Value::Number(n) => prop_assert_eq!(n.to_string(), raw.parse::<i64>().unwrap().to_string()),
                    Value::String(s) => prop_assert_eq!(s, raw),
                    other => prop_assert!(false, "unexpected value: {other:?}"),
                }
            }

            // structured fallback is idempotent: a string that fails to parse
            // comes back unchanged
            #[test]
            fn object_fallback_preserves_input(raw in "\\{[^}]*") {
                if serde_json::from_str::<Value>(&raw).is_err() {
                    prop_assert_eq!(coerce_value(&raw, Some("object")), Value::String(raw));
                }
            }
        }
    }
}
