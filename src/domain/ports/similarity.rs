//! Similarity scoring port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Normalised similarity between two text spans.
///
/// Scores are confidence values in roughly `[0, 1]`. A blank input on
/// either side scores 0 and must not be an error.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, a: &str, b: &str) -> DomainResult<f64>;
}
