//! Question-to-descriptor pipeline

use crate::normalize::normalize_completion;
use crate::parser::extract_descriptor;
use crate::prompt::{QueryPromptBuilder, INSTRUCTION_CLOSE};
use quarry_domain::{CompletionService, QueryDescriptor, Sampling};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Generation budget used when the caller does not supply one
pub const DEFAULT_EXTRACT_MAX_TOKENS: u32 = 100;

/// Drives prompt → completion → normalization → parsing for one question
///
/// Decoding is always greedy. Holds only a shared handle to the completion
/// service, so one instance can serve concurrent requests.
pub struct QueryExtractor<C: CompletionService + ?Sized> {
    service: Arc<C>,
}

impl<C: CompletionService + ?Sized> Clone for QueryExtractor<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<C: CompletionService + ?Sized> QueryExtractor<C> {
    /// Create a new extractor over a shared completion service
    pub fn new(service: Arc<C>) -> Self {
        Self { service }
    }

    /// Convert `question` into a descriptor
    ///
    /// Never fails: a completion error or unusable output yields
    /// [`QueryDescriptor::default`].
    pub async fn extract(&self, question: &str, max_tokens: u32) -> QueryDescriptor {
        let prompt = QueryPromptBuilder::new(question).build_with_envelope();
        debug!("Extraction prompt length: {} chars", prompt.len());

        let raw = match self
            .service
            .complete(&prompt, max_tokens, &Sampling::Greedy)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Completion failed during extraction: {}", e);
                return QueryDescriptor::default();
            }
        };

        debug!("Raw completion: {}", raw);

        let descriptor = extract_descriptor(normalize_completion(&raw, Some(INSTRUCTION_CLOSE)));

        info!(
            "Extracted descriptor: field_name={}, limit={:?}",
            descriptor.field_name, descriptor.limit
        );

        descriptor
    }
}
