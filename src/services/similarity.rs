//! Embedding-backed similarity scoring.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::ports::{EmbeddingProvider, SimilarityScorer};

/// Cosine similarity between two embedding vectors.
///
/// Returns 0 for empty, mismatched or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Scores two texts by the cosine of their embeddings.
pub struct EmbeddingSimilarityScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingSimilarityScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl SimilarityScorer for EmbeddingSimilarityScorer {
    async fn score(&self, a: &str, b: &str) -> DomainResult<f64> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Ok(0.0);
        }

        let left = self.provider.embed(a).await?;
        let right = self.provider.embed(b).await?;
        let score = cosine_similarity(&left, &right);

        tracing::debug!(provider = self.provider.name(), score, "cosine similarity");
        Ok(score)
    }
}
