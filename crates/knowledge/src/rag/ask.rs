//! Question answering orchestration.
//!
//! Each query walks one path through:
//!
//! ```text
//! START -> VAGUE_CHECK -> VAGUE_FALLBACK
//!                      -> RETRIEVE -> FILTER -> EMPTY_FALLBACK
//!                                            -> LOW_CONFIDENCE_FALLBACK
//!                                            -> COMPOSE
//! ```
//!
//! Every terminal state yields a response. Nothing is retried.

use crate::classifier::QueryClassifier;
use crate::config::{EngineConfig, RetrievalConfig};
use crate::corpus::CorpusStore;
use crate::embeddings::{create_provider, model_matches, EmbeddingConfig, EmbeddingProvider};
use crate::rag::compose::{Composer, GuidanceSelector};
use crate::rag::rank::{filter_rank, Ranking};
use crate::rag::retrieve::retrieve;
use crate::types::{CorpusStats, Outcome, WisdomResponse};
use gita_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;

/// Read-only answering context shared by all queries.
#[derive(Debug)]
pub struct WisdomEngine {
    corpus: Arc<CorpusStore>,
    provider: Arc<dyn EmbeddingProvider>,
    classifier: QueryClassifier,
    composer: Composer,
    retrieval: RetrievalConfig,
    normalize_query: bool,
}

impl WisdomEngine {
    /// Assemble an engine from loaded parts.
    ///
    /// The encoder must produce vectors of the index's dimension and, when
    /// the index records the encoder it was built with, be that encoder.
    pub fn new(
        corpus: Arc<CorpusStore>,
        provider: Arc<dyn EmbeddingProvider>,
        config: &EngineConfig,
    ) -> AppResult<Self> {
        config.retrieval.validate()?;

        let index = corpus.index();
        if !index.is_empty() {
            let encoder = EmbeddingConfig {
                provider: provider.provider_name().to_string(),
                dimensions: provider.dimensions(),
                ..config.embedding.clone()
            };
            encoder.validate_dimensions(index.dimensions())?;
        }

        match corpus.encoder() {
            Some(recorded) if !model_matches(recorded, provider.model_name()) => {
                return Err(AppError::Integrity(format!(
                    "Index was built with encoder '{}' but provider '{}' uses '{}'",
                    recorded,
                    provider.provider_name(),
                    provider.model_name()
                )));
            }
            Some(_) => {}
            None => tracing::warn!(
                "Index does not record its encoder; assuming '{}' matches",
                provider.model_name()
            ),
        }

        Ok(Self {
            corpus,
            provider,
            classifier: QueryClassifier::new(
                &config.classifier,
                config.retrieval.min_query_words,
            ),
            composer: Composer::new(&config.guidance),
            retrieval: config.retrieval.clone(),
            normalize_query: config.embedding.normalize,
        })
    }

    /// Load the corpus from disk and create the configured encoder.
    pub async fn load(corpus_dir: &Path, config: &EngineConfig) -> AppResult<Self> {
        let corpus = CorpusStore::load(corpus_dir, &config.corpus)?;
        let provider = create_provider(&config.embedding).await?;

        tracing::info!(
            "Using embedding provider '{}' (model: {})",
            provider.provider_name(),
            provider.model_name()
        );

        Self::new(Arc::new(corpus), provider, config)
    }

    /// Replace the guidance selector for answered queries.
    ///
    /// Fallback paragraphs stay those of the engine's configuration.
    pub fn with_guidance(mut self, selector: Box<dyn GuidanceSelector>) -> Self {
        self.composer.set_selector(selector);
        self
    }

    /// Answer a question with guidance and up to `max_answers` quotes.
    ///
    /// Callers reject empty input. Vague and low-confidence queries are
    /// answered with fallback paragraphs, not errors; only integrity and
    /// embedding failures are returned as `Err`.
    pub async fn answer_query(&self, question: &str) -> AppResult<WisdomResponse> {
        let constraints = self.classifier.infer_constraints(question);

        tracing::debug!(
            "Inferred constraints: themes={:?}, domains={:?}",
            constraints.themes,
            constraints.life_domains
        );

        if self.classifier.is_vague(question, &constraints) {
            tracing::info!("Query is too vague to answer");
            return Ok(self.fallback(Outcome::Vague));
        }

        let candidates = retrieve(
            &self.corpus,
            self.provider.as_ref(),
            question,
            self.retrieval.top_k,
            self.normalize_query,
        )
        .await?;

        match filter_rank(candidates, &constraints, &self.retrieval) {
            Ranking::Empty => {
                tracing::info!("No candidates survived filtering");
                Ok(self.fallback(Outcome::NoMatch))
            }
            Ranking::LowConfidence { best_score } => {
                tracing::info!(
                    "Best score {:.3} is below the {:.2} confidence threshold",
                    best_score,
                    self.retrieval.min_similarity_score
                );
                Ok(self.fallback(Outcome::LowConfidence))
            }
            Ranking::Selected(selected) => {
                tracing::info!(
                    "Answering with {} quotes (top score: {:.3})",
                    selected.len(),
                    selected[0].score
                );
                Ok(WisdomResponse {
                    guidance: self.composer.guidance(&selected).to_string(),
                    quotes: self.composer.quotes(&self.corpus, &selected),
                    outcome: Outcome::Answered,
                })
            }
        }
    }

    /// Statistics about the loaded corpus.
    pub fn stats(&self) -> CorpusStats {
        self.corpus.stats()
    }

    /// The encoder in use.
    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    fn fallback(&self, outcome: Outcome) -> WisdomResponse {
        WisdomResponse::fallback(self.composer.fallback_text(outcome), outcome)
    }
}
