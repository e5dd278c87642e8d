//! Concrete embedding providers.

#[cfg(feature = "fastembed")]
pub mod minilm;
pub mod trigram;
