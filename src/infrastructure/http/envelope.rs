//! Lenient decoding of API-gateway style responses.
//!
//! Upstream endpoints answer either with plain JSON or with an envelope
//! `{"statusCode": 200, "body": "<json string>"}`. Values inside may be
//! attribute-tagged (`{"S": "..."}`, `{"L": [...]}`, `{"M": {...}}`).

use serde_json::{Map, Value};

/// Why an envelope could not be turned into a usable body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("upstream reported status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream reported an error: {0}")]
    Reported(String),

    #[error("response body is not valid JSON: {0}")]
    Unparseable(String),
}

/// Extracts the payload from an optional envelope.
///
/// An empty or missing `body` yields an empty object. A payload carrying an
/// `error` string is turned into [`EnvelopeError::Reported`].
pub fn unwrap_body(raw: Value) -> Result<Value, EnvelopeError> {
    let Value::Object(mut outer) = raw else {
        return Ok(raw);
    };

    let status = outer
        .get("statusCode")
        .and_then(Value::as_u64)
        .map(|code| code as u16);

    let body = if outer.contains_key("body") || status.is_some() {
        match outer.remove("body") {
            Some(Value::String(text)) if text.trim().is_empty() => Value::Object(Map::new()),
            Some(Value::String(text)) => serde_json::from_str(&text)
                .map_err(|e| EnvelopeError::Unparseable(e.to_string()))?,
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(other) => other,
        }
    } else {
        Value::Object(outer)
    };

    if let Some(status) = status.filter(|code| !(200..300).contains(code)) {
        return Err(EnvelopeError::Status {
            status,
            message: reported_message(&body).unwrap_or_else(|| "no message".to_string()),
        });
    }

    if let Some(message) = body.get("error").and_then(attr_string) {
        return Err(EnvelopeError::Reported(message));
    }

    Ok(body)
}

/// Human readable message carried by a payload, if any.
pub fn reported_message(body: &Value) -> Option<String> {
    ["error", "message", "reason"]
        .iter()
        .find_map(|key| body.get(*key).and_then(attr_string))
}

/// Reads a string that may be plain or tagged as `S` / `N`.
pub fn attr_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("S")
            .or_else(|| map.get("N"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Reads a list that may be plain or tagged as `L`.
pub fn attr_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("L").and_then(Value::as_array),
        _ => None,
    }
}

/// Reads a map that may be plain or tagged as `M`.
pub fn attr_map(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    match map.get("M").and_then(Value::as_object) {
        Some(inner) => Some(inner),
        None => Some(map),
    }
}

/// Reads a boolean that may be plain or tagged as `BOOL`.
pub fn attr_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Object(map) => map.get("BOOL").and_then(Value::as_bool),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_body_is_parsed() {
        let raw = json!({ "statusCode": 200, "body": "{\"keywords\":[\"cbd\"]}" });
        assert_eq!(unwrap_body(raw).unwrap(), json!({ "keywords": ["cbd"] }));
    }

    #[test]
    fn test_object_body_is_used_as_is() {
        let raw = json!({ "statusCode": 200, "body": { "keywords": [] } });
        assert_eq!(unwrap_body(raw).unwrap(), json!({ "keywords": [] }));
    }

    #[test]
    fn test_plain_payload_passes_through() {
        let raw = json!({ "keywords": ["a"] });
        assert_eq!(unwrap_body(raw.clone()).unwrap(), raw);
    }

    #[test]
    fn test_missing_body_degrades_to_empty_object() {
        assert_eq!(unwrap_body(json!({ "statusCode": 200 })).unwrap(), json!({}));
        assert_eq!(
            unwrap_body(json!({ "statusCode": 200, "body": "" })).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_non_success_status_is_error() {
        let raw = json!({ "statusCode": 404, "body": "{\"message\":\"no such business\"}" });
        assert_eq!(
            unwrap_body(raw),
            Err(EnvelopeError::Status {
                status: 404,
                message: "no such business".into()
            })
        );
    }

    #[test]
    fn test_reported_error_is_error() {
        let raw = json!({ "body": "{\"error\":\"Business not found\"}" });
        assert_eq!(
            unwrap_body(raw),
            Err(EnvelopeError::Reported("Business not found".into()))
        );
    }

    #[test]
    fn test_garbage_body_is_unparseable() {
        let raw = json!({ "statusCode": 200, "body": "<html>" });
        assert!(matches!(unwrap_body(raw), Err(EnvelopeError::Unparseable(_))));
    }

    #[test]
    fn test_attribute_tagged_values() {
        assert_eq!(attr_string(&json!({ "S": "Towson" })).as_deref(), Some("Towson"));
        assert_eq!(attr_string(&json!("Towson")).as_deref(), Some("Towson"));
        assert_eq!(attr_string(&json!({ "N": "3" })).as_deref(), Some("3"));
        assert_eq!(attr_string(&json!(null)), None);

        let list = json!({ "L": [{ "S": "a" }] });
        assert_eq!(attr_list(&list).map(Vec::len), Some(1));

        let map = json!({ "M": { "city": { "S": "York" } } });
        assert!(attr_map(&map).unwrap().contains_key("city"));

        assert_eq!(attr_bool(&json!({ "BOOL": false })), Some(false));
    }
}
