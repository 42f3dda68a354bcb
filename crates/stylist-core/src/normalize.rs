//! Turning freeform model text into JSON.
//!
//! Order matters and callers rely on it: strict parse, then the substring
//! between the first `{` and the last `}`, then a sentinel object. This
//! never fails.

use serde_json::{json, Value};

/// Message placed in the sentinel's `error` field.
pub const PARSE_FAILURE: &str = "model output was not valid JSON";

/// Parse model output into JSON.
///
/// Returns `{"error": PARSE_FAILURE, "raw": <text>}` when neither the whole
/// text nor its outermost brace span parses.
pub fn parse_model_json(text: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return value;
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                return value;
            }
        }
    }

    json!({ "error": PARSE_FAILURE, "raw": text })
}

/// Whether `value` is the sentinel produced by [`parse_model_json`].
pub fn is_parse_failure(value: &Value) -> bool {
    value.get("error").and_then(Value::as_str) == Some(PARSE_FAILURE) && value.get("raw").is_some()
}
