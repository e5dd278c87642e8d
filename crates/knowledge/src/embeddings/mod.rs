//! Query embedding.
//!
//! Provides provider-agnostic text encoding into unit-length vectors that
//! are comparable with the prebuilt vector index.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::{model_matches, EmbeddingConfig, FASTEMBED_DEFAULT_MODEL, TRIGRAM_MODEL};
pub use provider::{create_provider, normalize, EmbeddingProvider};
