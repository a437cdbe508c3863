//! Lenient timestamp parsing for oracle output.
//!
//! The oracle's JSON is not a trusted, strictly-typed source even when a
//! response schema was requested: timestamps arrive as floats, numeric
//! strings, or clock strings like "01:02:03". Every timestamp field is
//! funneled through this module so malformed values coerce to 0.0 instead
//! of failing the chunk.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a timestamp string into seconds.
///
/// Accepted forms:
/// - `"MM:SS"` → `m * 60 + s`
/// - `"HH:MM:SS"` → `h * 3600 + m * 60 + s`
/// - plain float like `"45.5"` → `45.5`
///
/// Anything else (empty string, garbage, NaN, the wrong number of colon
/// parts) parses to `0.0`.
pub fn parse_time_to_seconds(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }

    if value.contains(':') {
        let parts: Vec<&str> = value.split(':').collect();
        let nums: Option<Vec<f64>> = parts.iter().map(|p| p.trim().parse::<f64>().ok()).collect();
        return match nums.as_deref() {
            Some([m, s]) => m * 60.0 + s,
            Some([h, m, s]) => h * 3600.0 + m * 60.0 + s,
            _ => 0.0,
        };
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Deserialize a timestamp field leniently.
///
/// Accepts a JSON number, a numeric or clock string, or `null`; anything
/// unusable becomes `0.0`. Combine with `#[serde(default)]` so a missing
/// field also lands on `0.0`.
pub fn lenient_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => {
            let n = n.as_f64().unwrap_or(0.0);
            if n.is_finite() { n } else { 0.0 }
        }
        Some(Value::String(s)) => parse_time_to_seconds(&s),
        _ => 0.0,
    })
}
