//! Engine configuration: corpus layout, retrieval tuning, classifier tables
//! and canned guidance.
//!
//! Every section is optional in `.gita/config.yaml`; missing values fall back
//! to the defaults below.

use crate::embeddings::EmbeddingConfig;
use gita_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration as read from the YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub corpus: CorpusFiles,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub guidance: GuidanceConfig,
}

/// File names of the prebuilt artifacts inside the corpus directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFiles {
    /// SQLite file holding the vectors
    #[serde(default = "default_index_file")]
    pub index: String,

    /// Position-aligned metadata table
    #[serde(default = "default_metadata_file")]
    pub metadata: String,

    /// Chunk text table
    #[serde(default = "default_chunks_file")]
    pub chunks: String,

    /// Directory of per-chapter verse files
    #[serde(default = "default_verses_dir")]
    pub verses_dir: String,
}

fn default_index_file() -> String {
    "gita.index.sqlite".to_string()
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_chunks_file() -> String {
    "gita_chunks.json".to_string()
}

fn default_verses_dir() -> String {
    "gita_json".to_string()
}

impl Default for CorpusFiles {
    fn default() -> Self {
        Self {
            index: default_index_file(),
            metadata: default_metadata_file(),
            chunks: default_chunks_file(),
            verses_dir: default_verses_dir(),
        }
    }
}

impl CorpusFiles {
    /// Get the vector index path.
    pub fn index_path(&self, corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(&self.index)
    }

    /// Get the metadata JSON path.
    pub fn metadata_path(&self, corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(&self.metadata)
    }

    /// Get the chunks JSON path.
    pub fn chunks_path(&self, corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(&self.chunks)
    }

    /// Get the verses directory.
    pub fn verses_dir(&self, corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(&self.verses_dir)
    }
}

/// Retrieval and ranking thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest neighbors requested from the index
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum number of quotes in an answer
    #[serde(default = "default_max_answers")]
    pub max_answers: usize,

    /// Best score below which an unconstrained query falls back
    #[serde(default = "default_min_similarity_score")]
    pub min_similarity_score: f64,

    /// Text similarity at or above which two quotes count as duplicates
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,

    /// Queries with fewer words and no constraints are vague
    #[serde(default = "default_min_query_words")]
    pub min_query_words: usize,
}

fn default_top_k() -> usize {
    40
}

fn default_max_answers() -> usize {
    2
}

fn default_min_similarity_score() -> f64 {
    0.45
}

fn default_duplicate_threshold() -> f64 {
    0.75
}

fn default_min_query_words() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_answers: default_max_answers(),
            min_similarity_score: default_min_similarity_score(),
            duplicate_threshold: default_duplicate_threshold(),
            min_query_words: default_min_query_words(),
        }
    }
}

impl RetrievalConfig {
    /// Reject settings the pipeline cannot honor.
    pub fn validate(&self) -> AppResult<()> {
        if self.top_k == 0 {
            return Err(AppError::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.max_answers == 0 {
            return Err(AppError::Config(
                "retrieval.max_answers must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_similarity_score) {
            return Err(AppError::Config(format!(
                "retrieval.min_similarity_score must be within [0, 1], got {}",
                self.min_similarity_score
            )));
        }
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err(AppError::Config(format!(
                "retrieval.duplicate_threshold must be within [0, 1], got {}",
                self.duplicate_threshold
            )));
        }
        Ok(())
    }
}

/// One keyword category: a label and the substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub label: String,
    pub keywords: Vec<String>,
}

impl KeywordCategory {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Keyword tables used by the query classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_life_domains")]
    pub life_domains: Vec<KeywordCategory>,

    #[serde(default = "default_themes")]
    pub themes: Vec<KeywordCategory>,
}

fn default_life_domains() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new(
            "career",
            &["job", "work", "career", "office", "profession", "salary", "boss"],
        ),
        KeywordCategory::new("fear", &["fear", "afraid", "anxiety", "anxious", "worry"]),
        KeywordCategory::new("family", &["family", "parents", "children", "relationship"]),
        KeywordCategory::new(
            "mental_health",
            &["stress", "mind", "peace", "calm", "depression"],
        ),
        KeywordCategory::new("purpose", &["lost", "meaning", "direction", "motivation"]),
    ]
}

fn default_themes() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new(
            "karma_yoga",
            &["duty", "action", "work", "results", "detachment"],
        ),
        KeywordCategory::new("bhakti", &["devotion", "faith", "surrender", "love"]),
        KeywordCategory::new("jnana", &["knowledge", "self", "soul", "truth"]),
        KeywordCategory::new("meditation", &["meditation", "focus", "mind"]),
    ]
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            life_domains: default_life_domains(),
            themes: default_themes(),
        }
    }
}

/// Canned guidance paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceConfig {
    /// Paragraph returned with quotes
    #[serde(default = "default_answer")]
    pub answer: String,

    /// Paragraph returned for vague queries
    #[serde(default = "default_vague_fallback")]
    pub vague_fallback: String,

    /// Paragraph returned when nothing adequate was retrieved
    #[serde(default = "default_low_confidence_fallback")]
    pub low_confidence_fallback: String,
}

fn default_answer() -> String {
    "When a person feels lost or lacks motivation, the Bhagavad Gita teaches that \
     clarity is not regained by withdrawing from life, but by engaging in one\u{2019}s duty \
     with the right understanding. Action performed without attachment to results \
     gradually restores inner strength, purpose, and peace."
        .to_string()
}

fn default_vague_fallback() -> String {
    "The Bhagavad Gita offers guidance for many aspects of life. \
     If you feel comfortable, could you share a little more about \
     what you are going through right now?"
        .to_string()
}

fn default_low_confidence_fallback() -> String {
    "The teachings of the Gita are subtle and wide-ranging. \
     I may need a bit more clarity about your situation to offer \
     relevant guidance. Please feel free to rephrase or expand your question."
        .to_string()
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            answer: default_answer(),
            vague_fallback: default_vague_fallback(),
            low_confidence_fallback: default_low_confidence_fallback(),
        }
    }
}

impl EngineConfig {
    /// Load engine configuration.
    ///
    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using default engine config", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config at {:?}: {}", path, e))
        })?;

        let config: EngineConfig = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("Failed to parse config at {:?}: {}", path, e))
        })?;

        config.retrieval.validate()?;

        tracing::debug!("Loaded engine config from {:?}", path);
        Ok(config)
    }
}
