//! Lenient accessors for provider JSON. Upstream shapes drift, so every
//! lookup yields `None` instead of failing, and numeric strings are coerced.

use chrono::{DateTime, Utc};
use serde_json::Value;

pub(crate) fn get_opt_f64(raw: &Value, pointer: &str) -> Option<f64> {
    match raw.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub(crate) fn get_opt_i64(raw: &Value, pointer: &str) -> Option<i64> {
    match raw.pointer(pointer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

pub(crate) fn get_opt_string(raw: &Value, pointer: &str) -> Option<String> {
    match raw.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a Unix timestamp in seconds.
pub(crate) fn get_opt_timestamp(raw: &Value, pointer: &str) -> Option<DateTime<Utc>> {
    get_opt_i64(raw, pointer).and_then(|secs| DateTime::from_timestamp(secs, 0))
}
