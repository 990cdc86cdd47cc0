//! Quarry Answerer
//!
//! Retrieval-augmented answering: the caller supplies the context, the model
//! answers from it alone, and the text after the final `Answer:` marker is
//! returned.

#![warn(missing_docs)]

mod answerer;
mod prompt;

pub use answerer::{finalize_answer, AnswerError, RagAnswerer, ANSWER_MARKER, DEFAULT_RAG_MAX_TOKENS};
pub use prompt::RagPromptBuilder;
