//! Embedding configuration types.

use gita_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Embedding configuration for the query encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "fastembed" (default), "trigram"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier (provider-specific)
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding vector dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Whether to normalize embeddings to unit length
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

fn default_provider() -> String {
    "fastembed".to_string()
}

fn default_model() -> String {
    FASTEMBED_DEFAULT_MODEL.to_string()
}

/// Model the prebuilt corpus is encoded with.
pub const FASTEMBED_DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Model id reported by the trigram provider.
pub const TRIGRAM_MODEL: &str = "trigram-v1";

fn default_dimensions() -> usize {
    384
}

fn default_normalize() -> bool {
    true
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dimensions: default_dimensions(),
            normalize: default_normalize(),
        }
    }
}

impl EmbeddingConfig {
    /// Offline trigram encoder of the given width.
    pub fn trigram(dimensions: usize) -> Self {
        Self {
            provider: "trigram".to_string(),
            model: TRIGRAM_MODEL.to_string(),
            dimensions,
            normalize: true,
        }
    }

    /// Apply a provider override (CLI flag or environment).
    ///
    /// Switching provider resets the model to that provider's default.
    pub fn with_provider(mut self, provider: Option<&str>) -> Self {
        if let Some(provider) = provider {
            if provider != self.provider {
                self.model = match provider {
                    "fastembed" => default_model(),
                    "trigram" => TRIGRAM_MODEL.to_string(),
                    _ => self.model,
                };
                self.provider = provider.to_string();
            }
        }
        self
    }

    /// Validate that the index dimension matches this encoder.
    pub fn validate_dimensions(&self, index_dimensions: usize) -> AppResult<()> {
        if self.dimensions != index_dimensions {
            return Err(AppError::Integrity(format!(
                "Dimension mismatch: encoder '{}' produces {}, index holds {}",
                self.provider, self.dimensions, index_dimensions
            )));
        }
        Ok(())
    }
}

/// Whether the encoder id recorded with an index names `model`.
///
/// Compares the last path segment case-insensitively, so
/// "sentence-transformers/all-MiniLM-L6-v2" matches "all-MiniLM-L6-v2".
pub fn model_matches(recorded: &str, model: &str) -> bool {
    let base = |name: &str| name.rsplit('/').next().unwrap_or(name).to_lowercase();
    base(recorded.trim()) == base(model.trim())
}
