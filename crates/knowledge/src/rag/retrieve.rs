//! Query embedding and nearest-neighbor retrieval.

use crate::corpus::CorpusStore;
use crate::embeddings::{normalize, EmbeddingProvider};
use crate::types::Candidate;
use gita_core::AppResult;

/// Embed `query` and return the `top_k` nearest chunks, unfiltered.
///
/// With `normalize_query` the query vector is scaled to unit length first,
/// so scores are cosine similarities against a unit-normalized index.
///
/// Candidates come back in index order: descending score, ties by
/// ascending position. A hit that cannot be resolved to metadata and chunk
/// text is an integrity error.
pub async fn retrieve(
    corpus: &CorpusStore,
    provider: &dyn EmbeddingProvider,
    query: &str,
    top_k: usize,
    normalize_query: bool,
) -> AppResult<Vec<Candidate>> {
    let mut embedding = provider.embed(query).await?;
    if normalize_query {
        normalize(&mut embedding);
    }

    let hits = corpus.index().search(&embedding, top_k)?;

    let candidates = hits
        .into_iter()
        .map(|(position, score)| {
            let (record, chunk) = corpus.resolve(position)?;
            Ok(Candidate {
                position,
                score,
                chapter: record.chapter,
                verse: record.verse,
                text: chunk.text.clone(),
                themes: record.themes.clone(),
                life_domains: record.life_domains.clone(),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    if let Some(best) = candidates.first() {
        tracing::debug!(
            "Retrieved {} candidates (best score {:.3} at position {})",
            candidates.len(),
            best.score,
            best.position
        );
    }

    Ok(candidates)
}
