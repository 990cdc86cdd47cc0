//! RAG answering pipeline

use crate::prompt::RagPromptBuilder;
use quarry_domain::{CompletionError, CompletionService, Sampling};
use quarry_extractor::normalize_completion;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Marker preceding the answer in the completion
pub const ANSWER_MARKER: &str = "Answer:";

/// Generation budget used when the caller does not supply one
pub const DEFAULT_RAG_MAX_TOKENS: u32 = 200;

/// Errors that can occur while answering
#[derive(Error, Debug)]
pub enum AnswerError {
    /// Completion backend failed
    #[error("{0}")]
    Completion(#[from] CompletionError),
}

/// Keep the text after the last `Answer:` marker
///
/// Without a marker the text is returned trimmed.
pub fn finalize_answer(text: &str) -> &str {
    match text.rsplit_once(ANSWER_MARKER) {
        Some((_, answer)) => answer.trim(),
        None => text.trim(),
    }
}

/// Answers questions using only caller-supplied context
pub struct RagAnswerer<C: CompletionService + ?Sized> {
    service: Arc<C>,
    sampling: Sampling,
}

impl<C: CompletionService + ?Sized> Clone for RagAnswerer<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sampling: self.sampling,
        }
    }
}

impl<C: CompletionService + ?Sized> RagAnswerer<C> {
    /// Create a new answerer with the default stochastic sampling
    pub fn new(service: Arc<C>) -> Self {
        Self {
            service,
            sampling: Sampling::rag_default(),
        }
    }

    /// Override the decoding strategy
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Answer `query` from `context`
    pub async fn answer(
        &self,
        query: &str,
        context: &str,
        max_tokens: u32,
    ) -> Result<String, AnswerError> {
        let prompt = RagPromptBuilder::new(query, context).build();
        debug!("Prompt:\n{}", prompt);

        let raw = self
            .service
            .complete(&prompt, max_tokens, &self.sampling)
            .await
            .map_err(|e| {
                error!("Error generating RAG response: {}", e);
                AnswerError::Completion(e)
            })?;

        let answer = finalize_answer(normalize_completion(&raw, None)).to_string();
        info!("Generated answer: {}", answer);

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_llm::MockProvider;

    #[test]
    fn test_finalize_after_marker() {
        assert_eq!(
            finalize_answer("...blah Answer: The capital is Paris."),
            "The capital is Paris."
        );
    }

    #[test]
    fn test_finalize_uses_last_marker() {
        let echoed = "Question:\nWhere?\nAnswer:\n Answer: Paris \n";
        assert_eq!(finalize_answer(echoed), "Paris");
    }

    #[test]
    fn test_finalize_without_marker() {
        assert_eq!(finalize_answer("  I don't know.\n"), "I don't know.");
    }

    #[tokio::test]
    async fn test_answer_strips_echoed_prompt() {
        let prompt = RagPromptBuilder::new("Capital?", "Paris is the capital.").build();
        let mut mock = MockProvider::default();
        mock.add_response(prompt.clone(), format!("{} The capital is Paris.", prompt));
        let provider = Arc::new(mock);

        let answerer = RagAnswerer::new(provider.clone());
        let answer = answerer
            .answer("Capital?", "Paris is the capital.", 200)
            .await
            .unwrap();

        assert_eq!(answer, "The capital is Paris.");
        let call = provider.last_call().unwrap();
        assert_eq!(call.max_new_tokens, 200);
        assert_eq!(call.sampling, Sampling::rag_default());
    }

    #[tokio::test]
    async fn test_custom_sampling() {
        let provider = Arc::new(MockProvider::new("Paris"));
        let answerer = RagAnswerer::new(provider.clone()).with_sampling(Sampling::Greedy);

        assert_eq!(answerer.answer("q", "c", 5).await.unwrap(), "Paris");
        assert_eq!(provider.last_call().unwrap().sampling, Sampling::Greedy);
    }

    #[tokio::test]
    async fn test_completion_error_propagates() {
        let answerer = RagAnswerer::new(Arc::new(MockProvider::failing("CUDA out of memory")));
        let err = answerer.answer("q", "c", 10).await.unwrap_err();
        assert!(matches!(err, AnswerError::Completion(_)));
        assert_eq!(err.to_string(), "Completion error: CUDA out of memory");
    }
}
