//! Retrieval gateway port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::DefectRecord;

/// Nearest-neighbour lookup over the defect index.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    /// Return the single closest defect for `text`, if any.
    ///
    /// `Ok(None)` is an expected outcome (empty index, blank query) and not a fault.
    async fn query(&self, text: &str) -> DomainResult<Option<DefectRecord>>;
}
