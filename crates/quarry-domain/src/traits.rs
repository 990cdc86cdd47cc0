//! Trait definitions for external interactions
//!
//! The language model is the only collaborator the pipelines talk to.
//! Implementations live in `quarry-llm`.

use crate::sampling::Sampling;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a completion backend
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Backend answered with something that is not a completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Completion error: {0}")]
    Other(String),
}

/// Text-completion backend
///
/// Loaded once at start-up and shared read-only by every request. Concurrent
/// calls are allowed; any queueing is the implementation's concern.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate at most `max_new_tokens` tokens continuing `prompt`
    async fn complete(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        sampling: &Sampling,
    ) -> Result<String, CompletionError>;
}
