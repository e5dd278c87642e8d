//! Candidate filtering, confidence gating and diversity selection.

use crate::config::RetrievalConfig;
use crate::rag::similarity::text_similarity;
use crate::types::{Candidate, QueryConstraints};

/// Result of ranking a query's candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    /// Nothing survived the topical filter
    Empty,

    /// Unconstrained query whose best candidate scored below the gate
    LowConfidence { best_score: f32 },

    /// Diverse candidates, best first (never empty)
    Selected(Vec<Candidate>),
}

/// Keep only candidates whose tags satisfy the constraints.
pub fn apply_constraints(
    candidates: Vec<Candidate>,
    constraints: &QueryConstraints,
) -> Vec<Candidate> {
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| constraints.admits(&c.themes, &c.life_domains))
        .collect();

    tracing::debug!(
        "Topical filter kept {} of {} candidates (themes: {:?}, domains: {:?})",
        kept.len(),
        before,
        constraints.themes,
        constraints.life_domains
    );

    kept
}

/// Greedily accept candidates that are not near-duplicates of any already
/// accepted one, up to `max_answers`.
///
/// Input order is preserved among accepted candidates.
pub fn select_distinct(
    candidates: Vec<Candidate>,
    max_answers: usize,
    duplicate_threshold: f64,
) -> Vec<Candidate> {
    let mut selected: Vec<Candidate> = Vec::with_capacity(max_answers);

    for candidate in candidates {
        if selected.len() == max_answers {
            break;
        }

        let duplicate_of = selected
            .iter()
            .find(|s| text_similarity(&candidate.text, &s.text) >= duplicate_threshold);

        match duplicate_of {
            Some(kept) => tracing::debug!(
                "Skipping position {} as a near-duplicate of position {}",
                candidate.position,
                kept.position
            ),
            None => selected.push(candidate),
        }
    }

    selected
}

/// Filter, sort, gate and de-duplicate retrieved candidates.
///
/// The confidence gate only applies when no constraints were inferred;
/// topical matches are trusted regardless of raw score.
pub fn filter_rank(
    candidates: Vec<Candidate>,
    constraints: &QueryConstraints,
    config: &RetrievalConfig,
) -> Ranking {
    let mut survivors = apply_constraints(candidates, constraints);

    if survivors.is_empty() {
        return Ranking::Empty;
    }

    // Stable: equal scores keep index order.
    survivors.sort_by(|a, b| b.score.total_cmp(&a.score));

    // The gate compares in f64 so a score of exactly 0.45f32 (0.4499999...)
    // stays below a 0.45 threshold.
    let best_score = survivors[0].score;
    if constraints.is_empty() && f64::from(best_score) < config.min_similarity_score {
        return Ranking::LowConfidence { best_score };
    }

    Ranking::Selected(select_distinct(
        survivors,
        config.max_answers,
        config.duplicate_threshold,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn tags(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(position: usize, score: f32, text: &str) -> Candidate {
        Candidate {
            position,
            score,
            chapter: 2,
            verse: position as u32 + 1,
            text: text.to_string(),
            themes: BTreeSet::new(),
            life_domains: BTreeSet::new(),
        }
    }

    const DISTINCT_TEXTS: &[&str] = &[
        "One who sees inaction in action is wise.",
        "Fear not; I shall free you from all sin.",
        "The senses are restless and carry away the mind.",
    ];

    fn tagged(position: usize, score: f32, themes: &[&str], domains: &[&str]) -> Candidate {
        Candidate {
            themes: tags(themes),
            life_domains: tags(domains),
            ..candidate(position, score, DISTINCT_TEXTS[position])
        }
    }

    fn positions(ranking: &Ranking) -> Vec<usize> {
        match ranking {
            Ranking::Selected(c) => c.iter().map(|c| c.position).collect(),
            other => panic!("expected selection, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_constraint_sets_skip_filtering() {
        let candidates = vec![tagged(0, 0.9, &[], &[]), tagged(1, 0.8, &["bhakti"], &[])];
        let kept = apply_constraints(candidates, &QueryConstraints::default());
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_theme_and_domain_filters_are_anded() {
        let constraints = QueryConstraints {
            themes: tags(&["karma_yoga"]),
            life_domains: tags(&["career"]),
        };
        let candidates = vec![
            tagged(0, 0.9, &["karma_yoga"], &["family"]),
            tagged(1, 0.8, &["karma_yoga"], &["career", "fear"]),
            tagged(2, 0.7, &["bhakti"], &["career"]),
        ];

        let kept = apply_constraints(candidates, &constraints);
        assert_eq!(kept.iter().map(|c| c.position).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_nothing_survives_filter() {
        let constraints = QueryConstraints {
            themes: BTreeSet::new(),
            life_domains: tags(&["family"]),
        };
        let ranking = filter_rank(
            vec![tagged(0, 0.99, &[], &["career"])],
            &constraints,
            &RetrievalConfig::default(),
        );
        assert_eq!(ranking, Ranking::Empty);
    }

    #[test]
    fn test_no_candidates_at_all() {
        let ranking = filter_rank(
            Vec::new(),
            &QueryConstraints::default(),
            &RetrievalConfig::default(),
        );
        assert_eq!(ranking, Ranking::Empty);
    }

    #[test]
    fn test_low_score_without_constraints_is_low_confidence() {
        let ranking = filter_rank(
            vec![candidate(0, 0.2, "a"), candidate(1, 0.44, "b")],
            &QueryConstraints::default(),
            &RetrievalConfig::default(),
        );
        assert_eq!(ranking, Ranking::LowConfidence { best_score: 0.44 });
    }

    #[test]
    fn test_gate_boundary_compares_in_f64() {
        // 0.45f32 widens to 0.44999998807907104
        let ranking = filter_rank(
            vec![candidate(0, 0.45, "steady wisdom")],
            &QueryConstraints::default(),
            &RetrievalConfig::default(),
        );
        assert_eq!(ranking, Ranking::LowConfidence { best_score: 0.45 });

        let next_up = f32::from_bits(0.45f32.to_bits() + 1);
        assert!(f64::from(next_up) >= 0.45);
        let ranking = filter_rank(
            vec![candidate(0, next_up, "steady wisdom")],
            &QueryConstraints::default(),
            &RetrievalConfig::default(),
        );
        assert_eq!(positions(&ranking), vec![0]);
    }

    #[test]
    fn test_constraints_bypass_confidence_gate() {
        let constraints = QueryConstraints {
            themes: BTreeSet::new(),
            life_domains: tags(&["fear"]),
        };
        let ranking = filter_rank(
            vec![tagged(0, -0.3, &[], &["fear"]), tagged(1, 0.01, &[], &["fear"])],
            &constraints,
            &RetrievalConfig::default(),
        );
        assert_eq!(positions(&ranking), vec![1, 0]);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let ranking = filter_rank(
            vec![
                candidate(0, 0.5, "one kind of passage"),
                candidate(1, 0.9, "completely different words"),
                candidate(2, 0.5, "xyz qrs tuv"),
            ],
            &QueryConstraints::default(),
            &RetrievalConfig {
                max_answers: 3,
                ..RetrievalConfig::default()
            },
        );
        assert_eq!(positions(&ranking), vec![1, 0, 2]);
    }

    #[test]
    fn test_near_duplicate_is_skipped() {
        let base = "Perform your duty without attachment to the results of action.";
        let paraphrase = "Perform your duty without any attachment to the results of action!";
        let distinct = "The soul is never born and never dies; it is eternal.";
        assert!(text_similarity(base, paraphrase) >= 0.75);
        assert!(text_similarity(base, distinct) < 0.75);

        let ranking = filter_rank(
            vec![
                candidate(0, 0.9, base),
                candidate(1, 0.85, paraphrase),
                candidate(2, 0.8, distinct),
                candidate(3, 0.7, "Surrender all actions unto me."),
                candidate(4, 0.6, "Be steady in yoga."),
            ],
            &QueryConstraints::default(),
            &RetrievalConfig::default(),
        );
        assert_eq!(positions(&ranking), vec![0, 2]);
    }

    #[test]
    fn test_select_distinct_stops_at_max_answers() {
        let selected = select_distinct(
            vec![
                candidate(0, 0.9, "aaaa"),
                candidate(1, 0.8, "bbbb"),
                candidate(2, 0.7, "cccc"),
            ],
            2,
            0.75,
        );
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_distinct_checks_every_accepted_quote() {
        // Position 2 is distinct from position 1 but a copy of position 0.
        let selected = select_distinct(
            vec![
                candidate(0, 0.9, "abcdefgh"),
                candidate(1, 0.8, "zyxwvuts"),
                candidate(2, 0.7, "abcdefgh"),
            ],
            3,
            0.75,
        );
        assert_eq!(
            selected.iter().map(|c| c.position).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }
}
