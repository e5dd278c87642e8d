//! Keyword-based query understanding.
//!
//! Detects life domains and themes by plain substring containment on the
//! lower-cased query, so "offices" still matches "office" and "mind" inside
//! "reminder" counts as a hit.

use crate::config::{ClassifierConfig, KeywordCategory};
use crate::types::QueryConstraints;
use std::collections::BTreeSet;

/// Infers topical constraints and flags vague queries.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    life_domains: Vec<KeywordCategory>,
    themes: Vec<KeywordCategory>,
    min_query_words: usize,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default(), 3)
    }
}

impl QueryClassifier {
    /// Build a classifier from keyword tables.
    ///
    /// Keywords are lower-cased once here so matching is case-insensitive.
    pub fn new(config: &ClassifierConfig, min_query_words: usize) -> Self {
        Self {
            life_domains: lowercase_table(&config.life_domains),
            themes: lowercase_table(&config.themes),
            min_query_words,
        }
    }

    /// Detect themes and life domains mentioned in `query`.
    pub fn infer_constraints(&self, query: &str) -> QueryConstraints {
        let lower = query.to_lowercase();

        QueryConstraints {
            themes: matching_labels(&self.themes, &lower),
            life_domains: matching_labels(&self.life_domains, &lower),
        }
    }

    /// A query is vague only when it is short and nothing was detected.
    pub fn is_vague(&self, query: &str, constraints: &QueryConstraints) -> bool {
        query.split_whitespace().count() < self.min_query_words && constraints.is_empty()
    }
}

fn lowercase_table(table: &[KeywordCategory]) -> Vec<KeywordCategory> {
    table
        .iter()
        .map(|category| KeywordCategory {
            label: category.label.clone(),
            keywords: category.keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
        .collect()
}

fn matching_labels(table: &[KeywordCategory], lower_query: &str) -> BTreeSet<String> {
    table
        .iter()
        .filter(|category| {
            category
                .keywords
                .iter()
                .any(|keyword| !keyword.is_empty() && lower_query.contains(keyword.as_str()))
        })
        .map(|category| category.label.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_fear_and_career() {
        let classifier = QueryClassifier::default();
        let constraints = classifier.infer_constraints("I am afraid of losing my job");

        assert_eq!(labels(&constraints.life_domains), vec!["career", "fear"]);
        assert!(constraints.themes.is_empty());
        assert!(!classifier.is_vague("I am afraid of losing my job", &constraints));
    }

    #[test]
    fn test_substring_matching_is_not_word_bounded() {
        let classifier = QueryClassifier::default();

        let constraints = classifier.infer_constraints("Offices everywhere");
        assert!(constraints.life_domains.contains("career"));

        // "self" inside "selfish"
        let constraints = classifier.infer_constraints("am I selfish");
        assert!(constraints.themes.contains("jnana"));
    }

    #[test]
    fn test_keyword_in_both_tables() {
        let classifier = QueryClassifier::default();

        let constraints = classifier.infer_constraints("my work");
        assert!(constraints.life_domains.contains("career"));
        assert!(constraints.themes.contains("karma_yoga"));

        let constraints = classifier.infer_constraints("calm the MIND");
        assert!(constraints.life_domains.contains("mental_health"));
        assert!(constraints.themes.contains("meditation"));
    }

    #[test]
    fn test_short_query_without_keywords_is_vague() {
        let classifier = QueryClassifier::default();

        let constraints = classifier.infer_constraints("hi");
        assert!(constraints.is_empty());
        assert!(classifier.is_vague("hi", &constraints));

        let constraints = classifier.infer_constraints("  hello there  ");
        assert!(classifier.is_vague("  hello there  ", &constraints));
    }

    #[test]
    fn test_short_query_with_keyword_is_not_vague() {
        let classifier = QueryClassifier::default();
        let constraints = classifier.infer_constraints("stress");
        assert!(!classifier.is_vague("stress", &constraints));
    }

    #[test]
    fn test_three_words_without_keywords_is_not_vague() {
        let classifier = QueryClassifier::default();
        let query = "asdkjasdj qwe zxc";
        let constraints = classifier.infer_constraints(query);
        assert!(constraints.is_empty());
        assert!(!classifier.is_vague(query, &constraints));
    }

    #[test]
    fn test_custom_table_is_case_insensitive() {
        let config = ClassifierConfig {
            life_domains: vec![KeywordCategory::new("health", &["Illness"])],
            themes: vec![],
        };
        let classifier = QueryClassifier::new(&config, 3);

        let constraints = classifier.infer_constraints("dealing with illness");
        assert_eq!(labels(&constraints.life_domains), vec!["health"]);
    }
}
