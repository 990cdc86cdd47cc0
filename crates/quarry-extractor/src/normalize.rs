//! Strip echoed prompt text from raw completions

/// Isolate the model's own output from a raw completion
///
/// When `marker` is given and present, everything up to and including its
/// first occurrence is dropped. The result is always trimmed. Never fails.
pub fn normalize_completion<'a>(text: &'a str, marker: Option<&str>) -> &'a str {
    let trimmed = text.trim();
    match marker.and_then(|m| trimmed.split_once(m)) {
        Some((_, rest)) => rest.trim(),
        None => trimmed,
    }
}
