//! Quarry Domain Layer
//!
//! Core types shared by the query-extraction and RAG pipelines. Nothing in
//! this crate performs I/O; the completion backend is reached only through
//! the [`traits::CompletionService`] trait.
//!
//! ## Key Concepts
//!
//! - **QueryDescriptor**: The four-key record describing an inferred query
//! - **SchemaField**: The closed set of fields in the `sales` collection
//! - **Sampling**: Greedy or stochastic decoding requested from the model
//! - **CompletionService**: Opaque prompt-to-text backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod sampling;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use descriptor::{FieldValue, Limit, QueryDescriptor};
pub use sampling::Sampling;
pub use schema::{SchemaField, ValueKind, COLLECTION_NAME, UNKNOWN_FIELD};
pub use traits::{CompletionError, CompletionService};
