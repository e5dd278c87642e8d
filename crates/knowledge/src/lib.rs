//! Bhagavad Gita wisdom retrieval.
//!
//! Loads a prebuilt corpus (vector index, tag metadata, chunk texts and
//! verse files) once, then answers questions with a guidance paragraph and
//! up to two supporting verse quotes.

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod index;
pub mod rag;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use classifier::QueryClassifier;
pub use config::{EngineConfig, RetrievalConfig};
pub use corpus::CorpusStore;
pub use rag::WisdomEngine;
pub use types::{CorpusStats, Outcome, QueryConstraints, Quote, WisdomResponse};
