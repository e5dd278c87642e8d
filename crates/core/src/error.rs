//! Error types for the Gita wisdom engine.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! corpus loading, index/corpus integrity and embedding failures.

use thiserror::Error;

/// Unified error type for the Gita wisdom engine.
///
/// Vague and low-confidence queries are not errors; they resolve to
/// fallback responses. Everything here is a real failure.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus artifacts could not be read or parsed
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// The vector index and the corpus tables disagree
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
