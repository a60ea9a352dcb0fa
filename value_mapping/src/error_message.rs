//! User-facing error message extraction
//!
//! Error payloads come in several shapes. Known message fields are probed in
//! priority order and the first non-empty string wins.

use crate::envelope::value_at;
use serde_json::Value;

const MESSAGE_PATHS: [&[&str]; 7] = [
    &["response", "data", "message"],
    &["response", "data", "error"],
    &["data", "message"],
    &["error", "message"],
    &["message"],
    &["error"],
    &["msg"],
];

/// Find the best message in an error payload
pub fn extract_error_message(payload: &Value) -> Option<String> {
    if let Value::String(s) = payload {
        return non_empty(s);
    }

    MESSAGE_PATHS.iter().find_map(|path| {
        value_at(payload, path)
            .and_then(Value::as_str)
            .and_then(non_empty)
    })
}

/// Payload fields first, then the plain message, then the fallback
pub fn resolve_error_message(payload: Option<&Value>, message: Option<&str>, fallback: &str) -> String {
    payload
        .and_then(extract_error_message)
        .or_else(|| message.and_then(non_empty))
        .unwrap_or_else(|| fallback.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
