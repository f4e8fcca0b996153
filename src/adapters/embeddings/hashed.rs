//! Offline embedding by feature hashing.
//!
//! Lowercased alphanumeric tokens are hashed (FNV-1a) into a fixed number
//! of buckets and the count vector is L2-normalised. Deterministic across
//! runs and platforms, no network access.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::ports::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone)]
pub struct HashedEmbeddingProvider {
    dimension: usize,
}

impl HashedEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in tokens(text) {
            #[allow(clippy::cast_possible_truncation)]
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for HashedEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        Ok(inputs
            .iter()
            .map(|input| EmbeddingOutput {
                id: input.id.clone(),
                vector: self.vectorize(&input.text),
            })
            .collect())
    }

    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::similarity::cosine_similarity;

    #[tokio::test]
    async fn test_case_and_punctuation_insensitive() {
        let provider = HashedEmbeddingProvider::new(128);
        let a = provider.embed("BIOS not booting up!").await.unwrap();
        let b = provider.embed("bios, NOT booting up").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_vectors_are_unit_length() {
        let provider = HashedEmbeddingProvider::new(64);
        let v = provider.embed("disk read error").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(v.len(), 64);
    }

    #[tokio::test]
    async fn test_blank_text_is_zero_vector() {
        let provider = HashedEmbeddingProvider::new(16);
        let v = provider.embed("  ...  ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(cosine_similarity(&v, &v), 0.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_ids() {
        let provider = HashedEmbeddingProvider::new(32);
        let outputs = provider
            .embed_batch(&[
                EmbeddingInput { id: "a".to_string(), text: "one".to_string() },
                EmbeddingInput { id: "b".to_string(), text: "two".to_string() },
            ])
            .await
            .unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].id, "b");
        assert_eq!(outputs[0].vector, provider.embed("one").await.unwrap());
    }

    #[test]
    fn test_zero_dimension_is_clamped() {
        assert_eq!(HashedEmbeddingProvider::new(0).dimension(), 1);
    }
}
