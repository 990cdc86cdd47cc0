//! Quarry Extractor
//!
//! Converts a natural-language question about the `sales` collection into a
//! [`QueryDescriptor`] using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Question → PromptBuilder → CompletionService → Normalizer → Parser → QueryDescriptor
//! ```
//!
//! The parser is permissive about where the JSON sits in the model output and
//! strict about the shape of the result: every failure resolves to
//! [`QueryDescriptor::default`], so callers never see an extraction error.
//!
//! # Example Usage
//!
//! ```
//! use quarry_extractor::extract_descriptor;
//! use quarry_domain::FieldValue;
//!
//! let descriptor = extract_descriptor(
//!     "Output: ```json\n{\"field_name\": \"CustomerID\", \"field_value\": \"17850\"}\n```",
//! );
//! assert_eq!(descriptor.field_name, "CustomerID");
//! assert_eq!(descriptor.field_value, FieldValue::Integer(17850));
//! assert_eq!(descriptor.collection_name, "sales");
//! ```
//!
//! [`QueryDescriptor`]: quarry_domain::QueryDescriptor
//! [`QueryDescriptor::default`]: quarry_domain::QueryDescriptor::default

#![warn(missing_docs)]

mod error;
mod extractor;
mod normalize;
mod parser;
mod prompt;

pub use error::PayloadError;
pub use extractor::{QueryExtractor, DEFAULT_EXTRACT_MAX_TOKENS};
pub use normalize::normalize_completion;
pub use parser::{
    coerce_field_value, coerce_limit, descriptor_from_object, extract_descriptor,
    isolate_payload, parse_descriptor, parse_payload, strip_noise,
};
pub use prompt::{wrap_instruction, QueryPromptBuilder, INSTRUCTION_CLOSE, INSTRUCTION_OPEN};
