//! In-memory test case storage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TestCaseRecord;
use crate::domain::ports::TestCaseStorage;

/// Storage that keeps the "persisted" table in memory.
///
/// Clones share the same table, so a test can hand one clone to a
/// [`RecordStore`](crate::services::RecordStore) and inspect writes through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTestCaseStorage {
    records: Arc<Mutex<Vec<TestCaseRecord>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryTestCaseStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TestCaseRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `save_all` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Current persisted table.
    pub fn snapshot(&self) -> Vec<TestCaseRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl TestCaseStorage for InMemoryTestCaseStorage {
    fn load(&self) -> DomainResult<Vec<TestCaseRecord>> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|e| DomainError::StorageError(format!("storage lock poisoned: {e}")))
    }

    fn save_all(&self, records: &[TestCaseRecord]) -> DomainResult<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| DomainError::StorageError(format!("storage lock poisoned: {e}")))?;
        *guard = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
