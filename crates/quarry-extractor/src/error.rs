//! Error types for the Extractor

use thiserror::Error;

/// Reasons a completion could not be read as a descriptor payload
///
/// Never escapes [`crate::extract_descriptor`]; every variant maps to the
/// default descriptor there.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// No `{ ... }` span in the cleaned text
    #[error("No JSON object found in completion")]
    NoObject,

    /// The candidate span is not valid JSON
    #[error("JSON parse error: {0}")]
    Syntax(#[from] serde_json::Error),
}
