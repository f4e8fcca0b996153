//! Persistence port for test case records.

use crate::domain::errors::DomainResult;
use crate::domain::models::TestCaseRecord;

/// Backing medium for the record store.
///
/// Writes always replace the whole persisted set. Single writer only.
pub trait TestCaseStorage: Send + Sync {
    /// Read every persisted record in storage order.
    fn load(&self) -> DomainResult<Vec<TestCaseRecord>>;

    /// Durably replace the persisted set with `records`.
    fn save_all(&self, records: &[TestCaseRecord]) -> DomainResult<()>;
}
