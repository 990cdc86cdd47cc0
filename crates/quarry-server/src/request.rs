//! Request payloads and parameter coercion.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /rag`
#[derive(Debug, Deserialize)]
pub struct RagRequest {
    /// User question
    pub query: String,

    /// Retrieved documents the answer must come from
    pub context: String,

    /// Generation budget, in any shape [`coerce_max_tokens`] accepts
    #[serde(default)]
    pub max_tokens: Option<Value>,
}

/// Read a token budget, falling back to `default`
///
/// Accepts a positive JSON integer, a float (truncated), or a numeric
/// string. Anything else, including zero and negatives, yields `default`.
pub fn coerce_max_tokens(value: Option<&Value>, default: u32) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 1.0)
                .map(|f| f.trunc() as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}
