//! Parse model output into a query descriptor
//!
//! The payload is located with a bracket-span heuristic: the first `{` to the
//! last `}` of the cleaned text. This is not a balanced-brace scan, so an
//! unrelated `{...}` in surrounding prose can widen the span and make the
//! parse fail (which then yields the default descriptor).

use crate::error::PayloadError;
use once_cell::sync::Lazy;
use quarry_domain::{FieldValue, Limit, QueryDescriptor, SchemaField};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Markdown fences, a bare `json` label, and an `Output:` prefix
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```json|```|json\s*|Output:\s*").expect("noise pattern is valid")
});

/// Remove known non-JSON artifacts anywhere in the text
pub fn strip_noise(text: &str) -> String {
    NOISE.replace_all(text, "").trim().to_string()
}

/// Locate the first-`{` to last-`}` span
pub fn isolate_payload(cleaned: &str) -> Result<&str, PayloadError> {
    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&cleaned[start..=end]),
        _ => Err(PayloadError::NoObject),
    }
}

/// Parse a candidate span as a JSON object
pub fn parse_payload(payload: &str) -> Result<Map<String, Value>, PayloadError> {
    Ok(serde_json::from_str(payload)?)
}

/// Convert an all-digit string limit to an integer; pass anything else through
pub fn coerce_limit(value: Value) -> Limit {
    match value {
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            match s.parse::<i64>() {
                Ok(n) => Limit::Count(n),
                Err(_) => Limit::Raw(Value::String(s)),
            }
        }
        other => Limit::from_json(other),
    }
}

/// Convert a string value to an integer when the field is numeric
///
/// A string that does not parse is kept unchanged.
pub fn coerce_field_value(field_name: &str, value: FieldValue) -> FieldValue {
    let numeric = SchemaField::from_name(field_name).is_some_and(|field| field.is_numeric());
    match value {
        FieldValue::Text(s) if numeric => match s.trim().parse::<i64>() {
            Ok(n) => FieldValue::Integer(n),
            Err(_) => FieldValue::Text(s),
        },
        other => other,
    }
}

/// String value of `key`, or `None` when absent or not a string
fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            debug!("Ignoring non-string {}: {}", key, other);
            None
        }
    }
}

/// Fill missing keys from the default descriptor, then coerce types
///
/// Defaulting is per key: keys present in `object` are kept.
pub fn descriptor_from_object(mut object: Map<String, Value>) -> QueryDescriptor {
    let defaults = QueryDescriptor::default();

    let collection_name =
        take_string(&mut object, "collection_name").unwrap_or(defaults.collection_name);
    let field_name = take_string(&mut object, "field_name").unwrap_or(defaults.field_name);
    let field_value = object
        .remove("field_value")
        .map(FieldValue::from_json)
        .unwrap_or(defaults.field_value);
    let limit = object
        .remove("limit")
        .map(coerce_limit)
        .unwrap_or(defaults.limit);

    let field_value = coerce_field_value(&field_name, field_value);

    QueryDescriptor {
        collection_name,
        field_name,
        field_value,
        limit,
    }
}

/// Parse normalized completion text, reporting why it failed
pub fn parse_descriptor(text: &str) -> Result<QueryDescriptor, PayloadError> {
    let cleaned = strip_noise(text);
    let payload = isolate_payload(&cleaned)?;
    let object = parse_payload(payload)?;
    Ok(descriptor_from_object(object))
}

/// Parse normalized completion text, falling back to the default descriptor
pub fn extract_descriptor(text: &str) -> QueryDescriptor {
    match parse_descriptor(text) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!("Falling back to default descriptor: {}", e);
            QueryDescriptor::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const GERMANY: &str = r#"{"collection_name": "sales", "field_name": "Country", "field_value": "Germany", "limit": 10}"#;

    fn germany() -> QueryDescriptor {
        QueryDescriptor {
            collection_name: "sales".to_string(),
            field_name: "Country".to_string(),
            field_value: FieldValue::from("Germany"),
            limit: Limit::Count(10),
        }
    }

    #[test]
    fn test_well_typed_object_unchanged() {
        assert_eq!(extract_descriptor(GERMANY), germany());

        let invoice = r#"{"collection_name": "sales", "field_name": "InvoiceNo", "field_value": 536365, "limit": 1}"#;
        let descriptor = extract_descriptor(invoice);
        assert_eq!(descriptor.field_value, FieldValue::Integer(536365));
        assert_eq!(descriptor.limit, Limit::Count(1));
    }

    #[test]
    fn test_no_braces_yields_default() {
        assert!(extract_descriptor("I cannot answer that.").is_default());
        assert!(extract_descriptor("{ never closed").is_default());
        assert!(extract_descriptor("never opened }").is_default());
        assert!(extract_descriptor("").is_default());
    }

    #[test]
    fn test_reversed_braces_yield_default() {
        assert!(extract_descriptor("} backwards {").is_default());
        assert!(matches!(
            isolate_payload("} x {"),
            Err(PayloadError::NoObject)
        ));
    }

    #[test]
    fn test_syntax_error_yields_default() {
        let broken = r#"{"field_name": "Country", "field_value": "France",}"#;
        assert!(matches!(
            parse_descriptor(broken),
            Err(PayloadError::Syntax(_))
        ));
        assert!(extract_descriptor(broken).is_default());
    }

    #[test]
    fn test_noise_is_ignored() {
        let variants = [
            format!("```json\n{}\n```", GERMANY),
            format!("```\n{}\n```", GERMANY),
            format!("JSON {}", GERMANY),
            format!("Output: {}", GERMANY),
            format!("output:\n```JSON\n{}\n```", GERMANY),
            format!("Here is the query you asked for:\n{}\nHope this helps.", GERMANY),
        ];
        for text in &variants {
            assert_eq!(extract_descriptor(text), germany(), "input: {}", text);
        }
    }

    #[test]
    fn test_strip_noise() {
        assert_eq!(strip_noise("```json\n{}\n```"), "{}");
        assert_eq!(strip_noise("OUTPUT:   {}"), "{}");
        assert_eq!(strip_noise("Json\t{}"), "{}");
    }

    #[test]
    fn test_missing_key_defaults_only_that_key() {
        let text = r#"{"collection_name": "sales", "field_name": "Country", "field_value": "Germany"}"#;
        let descriptor = extract_descriptor(text);
        assert_eq!(descriptor.field_name, "Country");
        assert_eq!(descriptor.field_value, FieldValue::from("Germany"));
        assert_eq!(descriptor.limit, Limit::Count(1));

        let descriptor = extract_descriptor(r#"{"limit": 5}"#);
        assert_eq!(descriptor.collection_name, "sales");
        assert_eq!(descriptor.field_name, "unknown");
        assert_eq!(descriptor.field_value, FieldValue::from("unknown"));
        assert_eq!(descriptor.limit, Limit::Count(5));
    }

    #[test]
    fn test_numeric_field_value_coercion() {
        let text = r#"{"field_name": "InvoiceNo", "field_value": "536365"}"#;
        assert_eq!(
            extract_descriptor(text).field_value,
            FieldValue::Integer(536365)
        );

        let text = r#"{"field_name": "InvoiceNo", "field_value": "abc"}"#;
        assert_eq!(extract_descriptor(text).field_value, FieldValue::from("abc"));
    }

    #[test]
    fn test_underscored_digits_stay_text() {
        let text = r#"{"field_name": "InvoiceNo", "field_value": "536_365"}"#;
        assert_eq!(
            extract_descriptor(text).field_value,
            FieldValue::from("536_365")
        );
    }

    #[test]
    fn test_huge_integer_value_survives_round_trip() {
        let text = r#"{"collection_name":"sales","field_name":"InvoiceNo","field_value":99999999999999999999,"limit":1}"#;
        let descriptor = extract_descriptor(text);
        assert_eq!(
            serde_json::to_string(&descriptor).unwrap(),
            r#"{"collection_name":"sales","field_name":"InvoiceNo","field_value":99999999999999999999,"limit":1}"#
        );
    }

    #[test]
    fn test_text_field_value_not_coerced() {
        let text = r#"{"field_name": "StockCode", "field_value": "85123"}"#;
        assert_eq!(extract_descriptor(text).field_value, FieldValue::from("85123"));
    }

    #[test]
    fn test_limit_coercion() {
        assert_eq!(coerce_limit(json!("10")), Limit::Count(10));
        assert_eq!(coerce_limit(json!(10)), Limit::Count(10));
        assert_eq!(coerce_limit(json!("ten")), Limit::Raw(json!("ten")));
        assert_eq!(coerce_limit(json!("-3")), Limit::Raw(json!("-3")));
        assert_eq!(coerce_limit(json!("")), Limit::Raw(json!("")));
        assert_eq!(
            coerce_limit(json!("99999999999999999999")),
            Limit::Raw(json!("99999999999999999999"))
        );
    }

    #[test]
    fn test_non_string_names_take_defaults() {
        let text = r#"{"collection_name": 7, "field_name": null, "field_value": "x", "limit": 2}"#;
        let descriptor = extract_descriptor(text);
        assert_eq!(descriptor.collection_name, "sales");
        assert_eq!(descriptor.field_name, "unknown");
        assert_eq!(descriptor.field_value, FieldValue::from("x"));
    }

    #[test]
    fn test_nested_braces_tolerated() {
        let text = r#"{"field_name": "Description", "field_value": "{gift} box", "limit": 1}"#;
        assert_eq!(
            extract_descriptor(text).field_value,
            FieldValue::from("{gift} box")
        );
    }

    #[test]
    fn test_unrelated_trailing_object_breaks_span() {
        let text = format!("{} and also {{\"note\": 1}}", GERMANY);
        assert!(extract_descriptor(&text).is_default());
    }

    proptest! {
        #[test]
        fn prop_digit_string_limits_become_integers(n in 0i64..i64::MAX) {
            prop_assert_eq!(coerce_limit(Value::String(n.to_string())), Limit::Count(n));
        }

        #[test]
        fn prop_text_without_braces_is_default(text in "[^{}]*") {
            prop_assert!(extract_descriptor(&text).is_default());
        }

        #[test]
        fn prop_customer_ids_coerce(id in 10000i64..100000) {
            let text = format!(
                r#"{{"field_name": "CustomerID", "field_value": "{}", "limit": "3"}}"#,
                id
            );
            let descriptor = extract_descriptor(&text);
            prop_assert_eq!(descriptor.field_value, FieldValue::Integer(id));
            prop_assert_eq!(descriptor.limit, Limit::Count(3));
        }
    }
}
