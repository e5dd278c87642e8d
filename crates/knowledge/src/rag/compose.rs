//! Answer composition: guidance selection and verse joins.

use crate::config::GuidanceConfig;
use crate::corpus::CorpusStore;
use crate::types::{Candidate, Outcome, Quote};

/// Chooses the guidance paragraph for an answered query.
///
/// Implementations may key on the selected candidates (e.g. by dominant
/// theme) but must stay deterministic.
pub trait GuidanceSelector: Send + Sync + std::fmt::Debug {
    fn select(&self, quotes: &[Candidate]) -> &str;
}

/// Returns the same paragraph for every answered query.
#[derive(Debug, Clone)]
pub struct FixedGuidance {
    text: String,
}

impl FixedGuidance {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl GuidanceSelector for FixedGuidance {
    fn select(&self, _quotes: &[Candidate]) -> &str {
        &self.text
    }
}

/// The canned texts for each terminal state.
#[derive(Debug)]
pub struct Composer {
    selector: Box<dyn GuidanceSelector>,
    vague_fallback: String,
    low_confidence_fallback: String,
}

impl Composer {
    pub fn new(config: &GuidanceConfig) -> Self {
        Self::with_selector(config, Box::new(FixedGuidance::new(config.answer.clone())))
    }

    /// Use a custom selector for answered queries.
    pub fn with_selector(config: &GuidanceConfig, selector: Box<dyn GuidanceSelector>) -> Self {
        Self {
            selector,
            vague_fallback: config.vague_fallback.clone(),
            low_confidence_fallback: config.low_confidence_fallback.clone(),
        }
    }

    /// Swap the selector, keeping the configured fallbacks.
    pub fn set_selector(&mut self, selector: Box<dyn GuidanceSelector>) {
        self.selector = selector;
    }

    /// Fallback paragraph for a non-answered outcome.
    pub fn fallback_text(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Vague => &self.vague_fallback,
            Outcome::NoMatch | Outcome::LowConfidence | Outcome::Answered => {
                &self.low_confidence_fallback
            }
        }
    }

    /// Guidance paragraph for an answered query.
    pub fn guidance(&self, selected: &[Candidate]) -> &str {
        self.selector.select(selected)
    }

    /// Join each candidate to its verse. Missing verses give empty strings.
    pub fn quotes(&self, corpus: &CorpusStore, selected: &[Candidate]) -> Vec<Quote> {
        selected
            .iter()
            .map(|c| {
                let verse = corpus.verse(c.chapter, c.verse);
                if verse.is_none() {
                    tracing::debug!("No verse text for {}.{}", c.chapter, c.verse);
                }

                Quote {
                    chapter: c.chapter,
                    verse: c.verse,
                    sanskrit: verse.map(|v| v.sanskrit.clone()).unwrap_or_default(),
                    translation: verse.map(|v| v.translation.clone()).unwrap_or_default(),
                    explanation: c.text.clone(),
                }
            })
            .collect()
    }
}
