//! Corpus and per-query type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tag record aligned positionally with one vector in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Chunk identifier (key into the chunk table)
    pub id: u64,

    /// Chapter number (1-based)
    pub chapter: u32,

    /// Verse number within the chapter
    pub verse: u32,

    /// Theme tags (e.g. "karma_yoga")
    #[serde(default)]
    pub themes: BTreeSet<String>,

    /// Life-domain tags (e.g. "career")
    #[serde(default)]
    pub life_domains: BTreeSet<String>,
}

/// A retrievable passage of explanatory text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier matching `VectorRecord::id`
    pub id: u64,

    /// Passage text
    pub text: String,
}

/// Canonical verse text, keyed by (chapter, verse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub chapter: u32,
    pub verse: u32,

    #[serde(default)]
    pub sanskrit: String,

    #[serde(default)]
    pub translation: String,
}

/// Topical constraints inferred from a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConstraints {
    /// Theme labels (may be empty)
    pub themes: BTreeSet<String>,

    /// Life-domain labels (may be empty)
    pub life_domains: BTreeSet<String>,
}

impl QueryConstraints {
    /// True when neither themes nor life domains were detected.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty() && self.life_domains.is_empty()
    }

    /// Check a record's tags against both constraint sets.
    ///
    /// An empty constraint set does not filter; a non-empty one requires at
    /// least one shared label.
    pub fn admits(&self, themes: &BTreeSet<String>, life_domains: &BTreeSet<String>) -> bool {
        let themes_ok = self.themes.is_empty() || !self.themes.is_disjoint(themes);
        let domains_ok =
            self.life_domains.is_empty() || !self.life_domains.is_disjoint(life_domains);
        themes_ok && domains_ok
    }
}

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position in the vector index
    pub position: usize,

    /// Inner-product similarity (higher is closer)
    pub score: f32,

    pub chapter: u32,
    pub verse: u32,

    /// Chunk text, used as the quote explanation
    pub text: String,

    /// Tags copied from the vector record
    pub themes: BTreeSet<String>,
    pub life_domains: BTreeSet<String>,
}

/// A supporting quote in an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub chapter: u32,
    pub verse: u32,
    pub sanskrit: String,
    pub translation: String,
    pub explanation: String,
}

/// Terminal state the pipeline reached for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Too short and unspecific; nothing was retrieved
    Vague,

    /// Retrieval ran but topical filtering left nothing
    NoMatch,

    /// Unconstrained query whose best score missed the confidence gate
    LowConfidence,

    /// Quotes were selected
    #[default]
    Answered,
}

impl Outcome {
    /// Whether the guidance is one of the fallback paragraphs.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Outcome::Answered)
    }
}

/// Final answer handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisdomResponse {
    /// Guidance paragraph
    pub guidance: String,

    /// Supporting quotes, most similar first
    pub quotes: Vec<Quote>,

    /// Internal: which terminal state produced this response.
    /// Used for logging and front ends, not part of the wire format.
    #[serde(skip_serializing, default)]
    pub outcome: Outcome,
}

impl WisdomResponse {
    /// A fallback response: canned guidance and no quotes.
    pub fn fallback(guidance: &str, outcome: Outcome) -> Self {
        Self {
            guidance: guidance.to_string(),
            quotes: Vec::new(),
            outcome,
        }
    }
}

/// Statistics about a loaded corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Number of vectors in the index
    pub vectors_count: usize,

    /// Number of chunks in the chunk table
    pub chunks_count: usize,

    /// Number of verse records
    pub verses_count: usize,

    /// Number of distinct chapters with verse records
    pub chapters_count: usize,

    /// Embedding dimension of the index
    pub dimensions: usize,

    /// Distinct theme tags across the metadata
    pub themes: BTreeSet<String>,

    /// Distinct life-domain tags across the metadata
    pub life_domains: BTreeSet<String>,
}
