//! Answer pipeline scenarios against the in-memory fixture corpus.

use super::fixtures::{store, KeyedProvider, PASSAGES};
use crate::config::{EngineConfig, GuidanceConfig};
use crate::rag::{GuidanceSelector, WisdomEngine};
use crate::types::{Candidate, Outcome, WisdomResponse};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (WisdomEngine, Arc<KeyedProvider>) {
        let provider = Arc::new(KeyedProvider::new());
        let engine = WisdomEngine::new(
            Arc::new(store()),
            provider.clone(),
            &EngineConfig::default(),
        )
        .unwrap();
        (engine, provider)
    }

    fn references(response: &WisdomResponse) -> Vec<(u32, u32)> {
        response
            .quotes
            .iter()
            .map(|q| (q.chapter, q.verse))
            .collect()
    }

    #[tokio::test]
    async fn test_vague_query_skips_retrieval() {
        let (engine, provider) = engine();

        let response = engine.answer_query("hi").await.unwrap();

        assert_eq!(response.outcome, Outcome::Vague);
        assert_eq!(response.guidance, GuidanceConfig::default().vague_fallback);
        assert!(response.quotes.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_query_with_keyword_is_answered() {
        let (engine, provider) = engine();

        // One word, but "peace" names the mental_health domain. Every score
        // is zero; the constraint bypasses the confidence gate.
        let response = engine.answer_query("peace?").await.unwrap();

        assert_eq!(response.outcome, Outcome::Answered);
        assert_eq!(references(&response), vec![(6, 35)]);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_near_duplicate_is_replaced_by_next_distinct() {
        let (engine, _) = engine();

        // Scores: 2.47 = 1.0, 3.19 = 0.96 (paraphrase of 2.47), 3.8 = 0.8
        let response = engine
            .answer_query("How should I approach my duty at work?")
            .await
            .unwrap();

        assert_eq!(response.outcome, Outcome::Answered);
        assert_eq!(response.guidance, GuidanceConfig::default().answer);
        assert_eq!(references(&response), vec![(2, 47), (3, 8)]);
        assert_eq!(response.quotes[0].explanation, PASSAGES[0]);
        assert_eq!(response.quotes[1].explanation, PASSAGES[2]);
        assert_eq!(response.quotes[0].sanskrit, "sanskrit 2.47");
        assert_eq!(response.quotes[1].translation, "translation 3.8");
    }

    #[tokio::test]
    async fn test_constrained_query_bypasses_confidence_gate() {
        let (engine, _) = engine();

        // fear + career; best score is 0.3, below the 0.45 gate
        let response = engine
            .answer_query("I am afraid of failing at my job")
            .await
            .unwrap();

        assert_eq!(response.outcome, Outcome::Answered);
        assert_eq!(references(&response), vec![(18, 66), (3, 8)]);
    }

    #[tokio::test]
    async fn test_unconstrained_low_score_falls_back() {
        let (engine, provider) = engine();

        let response = engine.answer_query("qwzx plorf vrenk").await.unwrap();

        assert_eq!(response.outcome, Outcome::LowConfidence);
        assert_eq!(
            response.guidance,
            GuidanceConfig::default().low_confidence_fallback
        );
        assert!(response.quotes.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_nothing_tagged_for_domain_falls_back() {
        let (engine, _) = engine();

        let response = engine.answer_query("my family keeps arguing").await.unwrap();

        assert_eq!(response.outcome, Outcome::NoMatch);
        assert_eq!(
            response.guidance,
            GuidanceConfig::default().low_confidence_fallback
        );
        assert!(response.quotes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_verse_gives_empty_text() {
        let (engine, _) = engine();

        let response = engine.answer_query("how to calm the mind").await.unwrap();

        assert_eq!(references(&response), vec![(6, 35)]);
        let quote = &response.quotes[0];
        assert_eq!(quote.sanskrit, "");
        assert_eq!(quote.translation, "");
        assert_eq!(quote.explanation, PASSAGES[4]);
    }

    #[tokio::test]
    async fn test_answers_are_deterministic() {
        let (engine, _) = engine();
        let question = "How should I approach my duty at work?";

        let first = engine.answer_query(question).await.unwrap();
        let second = engine.answer_query(question).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_engine() {
        let (engine, provider) = engine();
        let engine = Arc::new(engine);

        let a = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.answer_query("I am afraid of failing at my job").await })
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.answer_query("how to calm the mind").await })
        };

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();

        assert_eq!(references(&a), vec![(18, 66), (3, 8)]);
        assert_eq!(references(&b), vec![(6, 35)]);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_max_answers_setting() {
        let provider = Arc::new(KeyedProvider::new());
        let mut config = EngineConfig::default();
        config.retrieval.max_answers = 1;
        let engine = WisdomEngine::new(Arc::new(store()), provider, &config).unwrap();

        let response = engine
            .answer_query("How should I approach my duty at work?")
            .await
            .unwrap();

        assert_eq!(references(&response), vec![(2, 47)]);
    }

    #[derive(Debug)]
    struct DomainGuidance;

    impl GuidanceSelector for DomainGuidance {
        fn select(&self, quotes: &[Candidate]) -> &str {
            if quotes.iter().any(|c| c.life_domains.contains("fear")) {
                "Fear dissolves in surrender."
            } else {
                "Act without attachment."
            }
        }
    }

    #[tokio::test]
    async fn test_custom_guidance_selector() {
        let config = EngineConfig {
            guidance: GuidanceConfig {
                vague_fallback: "Tell me more about what troubles you.".to_string(),
                ..GuidanceConfig::default()
            },
            ..EngineConfig::default()
        };
        let engine = WisdomEngine::new(
            Arc::new(store()),
            Arc::new(KeyedProvider::new()),
            &config,
        )
        .unwrap()
        .with_guidance(Box::new(DomainGuidance));

        let fear = engine
            .answer_query("I am afraid of failing at my job")
            .await
            .unwrap();
        assert_eq!(fear.guidance, "Fear dissolves in surrender.");

        let duty = engine
            .answer_query("How should I approach my duty at work?")
            .await
            .unwrap();
        assert_eq!(duty.guidance, "Act without attachment.");

        // Fallbacks stay those the engine was built with
        let vague = engine.answer_query("hi").await.unwrap();
        assert_eq!(vague.guidance, "Tell me more about what troubles you.");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let config = EngineConfig::default();
        let provider = Arc::new(crate::embeddings::providers::trigram::TrigramProvider::new(384));

        let result = WisdomEngine::new(Arc::new(store()), provider, &config);
        let err = result.unwrap_err();
        assert!(matches!(err, gita_core::AppError::Integrity(_)));
        assert!(err.to_string().contains("Dimension mismatch"));
    }
}
