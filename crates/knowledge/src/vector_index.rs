//! Vector index abstraction over the prebuilt embeddings.
//!
//! Defines a read-only search trait and an exhaustive inner-product index.

use gita_core::{AppError, AppResult};
use std::cmp::Ordering;

/// Trait for nearest-neighbor backends.
///
/// Implementations are queried concurrently and must not mutate on search.
pub trait VectorIndex: Send + Sync {
    /// Number of vectors held.
    fn len(&self) -> usize;

    /// Whether the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the stored vectors.
    fn dimensions(&self) -> usize;

    /// Search for the `top_k` highest inner products with `query`.
    ///
    /// Returns `(position, score)` pairs ordered by descending score. Equal
    /// scores are ordered by ascending position.
    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<(usize, f32)>>;
}

/// Exhaustive inner-product index.
///
/// With unit-length vectors the inner product equals cosine similarity.
/// Exact search is a valid answer to any top-k request and keeps results
/// reproducible.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl FlatIndex {
    /// Build an index over vectors that all share one dimension.
    pub fn new(vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        if let Some((position, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(AppError::Integrity(format!(
                "Vector {} has dimension {}, expected {}",
                position,
                v.len(),
                dimensions
            )));
        }
        Ok(Self {
            vectors,
            dimensions,
        })
    }
}

impl VectorIndex for FlatIndex {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<(usize, f32)>> {
        if self.vectors.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dimensions {
            return Err(AppError::Integrity(format!(
                "Query has dimension {}, index holds {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| (position, inner_product(query, v)))
            .collect();

        scored.sort_by(|a, b| compare_hits(a, b));
        scored.truncate(top_k);

        tracing::debug!(
            "Index search returned {} hits (requested top-{})",
            scored.len(),
            top_k
        );

        Ok(scored)
    }
}

/// Descending score, then ascending position.
fn compare_hits(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
