//! In-memory nearest-neighbour index over defect descriptions.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DefectRecord;
use crate::domain::ports::{EmbeddingInput, EmbeddingProvider, RetrievalGateway};
use crate::services::similarity::cosine_similarity;

struct IndexedDefect {
    record: DefectRecord,
    vector: Vec<f32>,
}

/// Defects embedded once at build time, queried by cosine similarity.
pub struct EmbeddingDefectIndex {
    entries: Vec<IndexedDefect>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingDefectIndex {
    /// Embed every defect description.
    pub async fn build(
        defects: Vec<DefectRecord>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> DomainResult<Self> {
        let inputs: Vec<EmbeddingInput> = defects
            .iter()
            .enumerate()
            .map(|(i, defect)| EmbeddingInput {
                id: i.to_string(),
                text: defect.description.clone(),
            })
            .collect();

        let outputs = provider.embed_batch(&inputs).await?;
        if outputs.len() != defects.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "expected {} defect embeddings, got {}",
                defects.len(),
                outputs.len()
            )));
        }

        let entries = defects
            .into_iter()
            .zip(outputs)
            .map(|(record, output)| IndexedDefect {
                record,
                vector: output.vector,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            defects = entries.len(),
            provider = provider.name(),
            "defect index built"
        );
        Ok(Self { entries, provider })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RetrievalGateway for EmbeddingDefectIndex {
    async fn query(&self, text: &str) -> DomainResult<Option<DefectRecord>> {
        if self.entries.is_empty() || text.trim().is_empty() {
            return Ok(None);
        }

        let query = self.provider.embed(text).await?;
        let best = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(&query, &entry.vector), entry))
            .fold(None, |best: Option<(f64, &IndexedDefect)>, (score, entry)| match best {
                Some((top, _)) if top >= score => best,
                _ => Some((score, entry)),
            });

        Ok(best.map(|(score, entry)| {
            tracing::debug!(score, module = %entry.record.module, "nearest defect");
            entry.record.clone()
        }))
    }
}
