//! Quarry Completion Providers
//!
//! Implementations of the `CompletionService` trait from `quarry-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Ollama text-completion API
//!
//! # Examples
//!
//! ```
//! use quarry_llm::MockProvider;
//! use quarry_domain::{CompletionService, Sampling};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let result = rt
//!     .block_on(provider.complete("test prompt", 16, &Sampling::Greedy))
//!     .unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use quarry_domain::{CompletionError, CompletionService, Sampling};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use ollama::OllamaProvider;

/// Parameters of the most recent call made to a [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Prompt exactly as received
    pub prompt: String,
    /// Generation budget
    pub max_new_tokens: u32,
    /// Requested decoding strategy
    pub sampling: Sampling,
}

#[derive(Debug, Clone)]
enum Canned {
    Text(String),
    Error(String),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Clones share the same call log.
///
/// # Examples
///
/// ```
/// use quarry_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_error("prompt2");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Canned,
    responses: Arc<Mutex<HashMap<String, Canned>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Canned::Text(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider that fails every call with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_response: Canned::Error(message.into()),
            ..Self::new("")
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Canned::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Canned::Error("Mock error".to_string()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Get the most recent call, if any
    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    /// Forget all recorded calls
    pub fn reset_call_count(&self) {
        lock(&self.calls).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionService for MockProvider {
    async fn complete(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        sampling: &Sampling,
    ) -> Result<String, CompletionError> {
        lock(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            max_new_tokens,
            sampling: *sampling,
        });

        let canned = lock(&self.responses)
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());

        match canned {
            Canned::Text(text) => Ok(text),
            Canned::Error(message) => Err(CompletionError::Other(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete("any prompt", 10, &Sampling::Greedy).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        let greedy = Sampling::Greedy;
        assert_eq!(provider.complete("hello", 1, &greedy).await.unwrap(), "world");
        assert_eq!(provider.complete("foo", 1, &greedy).await.unwrap(), "bar");
        assert_eq!(
            provider.complete("unknown", 1, &greedy).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_records_calls() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);
        assert!(provider.last_call().is_none());

        provider.complete("prompt1", 100, &Sampling::Greedy).await.unwrap();
        provider
            .complete("prompt2", 200, &Sampling::rag_default())
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 2);

        let last = provider.last_call().unwrap();
        assert_eq!(last.prompt, "prompt2");
        assert_eq!(last.max_new_tokens, 200);
        assert_eq!(last.sampling, Sampling::rag_default());

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete("bad prompt", 1, &Sampling::Greedy).await;
        assert!(matches!(result.unwrap_err(), CompletionError::Other(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_failing() {
        let provider = MockProvider::failing("CUDA out of memory");
        let err = provider
            .complete("anything", 1, &Sampling::Greedy)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Completion error: CUDA out of memory");
    }

    #[tokio::test]
    async fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete("test", 1, &Sampling::Greedy).await.unwrap();

        // Both share the same call log due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
