//! Local sentence-transformer embeddings through `fastembed`.

use crate::embeddings::config::{model_matches, EmbeddingConfig};
use crate::embeddings::provider::{normalize, EmbeddingProvider};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use gita_core::{AppError, AppResult};
use std::sync::{Arc, Mutex};

/// Supported model ids and their fastembed models.
const MODELS: &[(&str, EmbeddingModel)] = &[
    ("all-MiniLM-L6-v2", EmbeddingModel::AllMiniLML6V2),
    ("all-MiniLM-L12-v2", EmbeddingModel::AllMiniLML12V2),
    ("bge-small-en-v1.5", EmbeddingModel::BGESmallENV15),
];

/// Map a configured model id to a fastembed model and its canonical id.
///
/// Organisation prefixes are ignored ("sentence-transformers/..."). Unknown
/// ids are a configuration error rather than a silent fallback.
pub fn resolve_model(name: &str) -> AppResult<(EmbeddingModel, &'static str)> {
    MODELS
        .iter()
        .find(|(id, _)| model_matches(name, id))
        .map(|(id, model)| (model.clone(), *id))
        .ok_or_else(|| {
            let supported: Vec<&str> = MODELS.iter().map(|(id, _)| *id).collect();
            AppError::Config(format!(
                "Unsupported fastembed model: '{}'. Supported models: {}",
                name,
                supported.join(", ")
            ))
        })
}

/// Local sentence-transformer encoder (all-MiniLM-L6-v2 by default, the
/// model the prebuilt index was encoded with).
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimensions: usize,
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model_name", &self.model_name)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl FastEmbedProvider {
    /// Load (downloading on first use) the model on a blocking task.
    pub async fn load(config: &EmbeddingConfig) -> AppResult<Self> {
        let (embedding_model, model_name) = resolve_model(&config.model)?;
        tracing::info!("Loading embedding model: {}", model_name);

        let (model, dimensions) =
            tokio::task::spawn_blocking(move || -> AppResult<(TextEmbedding, usize)> {
                let options =
                    InitOptions::new(embedding_model).with_show_download_progress(false);

                let mut model = TextEmbedding::try_new(options)
                    .map_err(|e| AppError::Embedding(format!("Failed to load model: {}", e)))?;

                let sample = model
                    .embed(vec!["dimension check".to_string()], None)
                    .map_err(|e| AppError::Embedding(format!("Model warm-up failed: {}", e)))?;
                let dimensions = sample.first().map(|v| v.len()).unwrap_or(0);

                Ok((model, dimensions))
            })
            .await
            .map_err(|e| AppError::Embedding(format!("Model loader task failed: {}", e)))??;

        config.validate_dimensions(dimensions)?;
        tracing::info!("Embedding model loaded. Dimension: {}", dimensions);

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: model_name.to_string(),
            dimensions,
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn provider_name(&self) -> &str {
        "fastembed"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let batch = texts.to_vec();

        let mut embeddings = tokio::task::spawn_blocking(move || -> AppResult<Vec<Vec<f32>>> {
            let mut guard = model
                .lock()
                .map_err(|_| AppError::Embedding("Embedding model lock poisoned".to_string()))?;
            guard
                .embed(batch, None)
                .map_err(|e| AppError::Embedding(format!("Embedding failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::Embedding(format!("Embedding task failed: {}", e)))??;

        for embedding in &mut embeddings {
            normalize(embedding);
        }

        Ok(embeddings)
    }
}
