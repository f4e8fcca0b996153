//! Module-keyed store of test case records.
//!
//! The store is an owned component: callers hold the single owning
//! reference and pass it explicitly to whatever needs it. Every successful
//! append rewrites the whole backing table.

use std::collections::HashSet;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TestCaseRecord;
use crate::domain::ports::TestCaseStorage;

pub struct RecordStore {
    records: Vec<TestCaseRecord>,
    storage: Box<dyn TestCaseStorage>,
    /// Set when the backing table exists but could not be read. Writing
    /// would replace rows that were never loaded, so appends are refused.
    load_failed: bool,
}

impl RecordStore {
    /// Load the persisted records.
    ///
    /// A missing or unreadable backing table is not fatal: the store starts
    /// empty. An unreadable table is still never overwritten.
    pub fn open(storage: Box<dyn TestCaseStorage>) -> Self {
        let (records, load_failed) = match storage.load() {
            Ok(records) => {
                tracing::debug!(count = records.len(), "loaded persisted test cases");
                (records, false)
            }
            Err(err) => {
                tracing::warn!(error = %err, "test case storage unavailable, starting empty");
                (Vec::new(), true)
            }
        };

        Self {
            records,
            storage,
            load_failed,
        }
    }

    /// Proper records for `module`, in storage order.
    pub fn lookup(&self, module: &str) -> Vec<TestCaseRecord> {
        self.records
            .iter()
            .filter(|record| record.module == module && record.is_proper())
            .cloned()
            .collect()
    }

    /// Append every candidate that is not already stored.
    ///
    /// Duplicates are detected on all six fields, including against
    /// candidates accepted earlier in the same call. Storage is rewritten
    /// only when something was added, and the in-memory set changes only
    /// after that write succeeds.
    pub fn append_if_new(
        &mut self,
        candidates: Vec<TestCaseRecord>,
    ) -> DomainResult<Vec<TestCaseRecord>> {
        self.append_up_to(candidates, usize::MAX)
    }

    /// Like [`append_if_new`](Self::append_if_new), but accepts at most
    /// `limit` new records. Duplicates never use up the limit, so spare
    /// candidates further down the batch take their place.
    pub fn append_up_to(
        &mut self,
        candidates: Vec<TestCaseRecord>,
        limit: usize,
    ) -> DomainResult<Vec<TestCaseRecord>> {
        let mut seen: HashSet<&TestCaseRecord> = self.records.iter().collect();
        let mut added = Vec::new();
        let mut duplicates = 0_usize;
        for candidate in &candidates {
            if added.len() >= limit {
                break;
            }
            if seen.insert(candidate) {
                added.push(candidate.clone());
            } else {
                duplicates += 1;
            }
        }

        let unused = candidates.len() - added.len() - duplicates;
        if added.is_empty() {
            tracing::info!(duplicates, "no new test cases to save (duplicates skipped)");
            return Ok(added);
        }

        if self.load_failed {
            return Err(DomainError::StorageError(
                "persisted test cases could not be read; refusing to overwrite them".to_string(),
            ));
        }

        let mut next = Vec::with_capacity(self.records.len() + added.len());
        next.extend(self.records.iter().cloned());
        next.extend(added.iter().cloned());

        self.storage.save_all(&next)?;
        self.records = next;

        tracing::info!(added = added.len(), duplicates, unused, "saved new test case(s)");
        Ok(added)
    }

    pub fn contains(&self, record: &TestCaseRecord) -> bool {
        self.records.contains(record)
    }

    /// Total records held, proper or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTestCaseStorage;
    use crate::domain::errors::DomainError;

    fn case(module: &str, scenario: &str) -> TestCaseRecord {
        TestCaseRecord {
            module: module.to_string(),
            scenario: scenario.to_string(),
            steps: "Apply the fix and reboot".to_string(),
            prerequisite: "Affected unit available".to_string(),
            pass_fail_criteria: "Symptom gone".to_string(),
            expected_result: "Unit boots".to_string(),
        }
    }

    struct BrokenStorage;

    impl TestCaseStorage for BrokenStorage {
        fn load(&self) -> DomainResult<Vec<TestCaseRecord>> {
            Err(DomainError::StorageError("unreadable".to_string()))
        }

        fn save_all(&self, _records: &[TestCaseRecord]) -> DomainResult<()> {
            Err(DomainError::StorageError("disk full".to_string()))
        }
    }

    #[test]
    fn test_lookup_filters_by_module_and_properness() {
        let mut improper = case("BIOS", "Half written");
        improper.steps = "  ".to_string();
        let storage = InMemoryTestCaseStorage::with_records(vec![
            case("BIOS", "Cold boot"),
            case("Network", "Link up"),
            improper,
            case("BIOS", "Warm boot"),
        ]);
        let store = RecordStore::open(Box::new(storage));

        let found = store.lookup("BIOS");
        let scenarios: Vec<_> = found.iter().map(|r| r.scenario.as_str()).collect();
        assert_eq!(scenarios, vec!["Cold boot", "Warm boot"]);
        assert!(store.lookup("Storage").is_empty());
    }

    #[test]
    fn test_module_match_is_exact() {
        let store = RecordStore::open(Box::new(InMemoryTestCaseStorage::with_records(vec![
            case("BIOS", "Cold boot"),
        ])));
        assert!(store.lookup("bios").is_empty());
        assert!(store.lookup("BIOS ").is_empty());
    }

    #[test]
    fn test_unreadable_storage_starts_empty() {
        let store = RecordStore::open(Box::new(BrokenStorage));
        assert!(store.is_empty());
        assert!(store.lookup("BIOS").is_empty());
    }

    #[test]
    fn test_append_skips_existing_and_in_batch_duplicates() {
        let storage = InMemoryTestCaseStorage::with_records(vec![case("BIOS", "Cold boot")]);
        let handle = storage.clone();
        let mut store = RecordStore::open(Box::new(storage));

        let added = store
            .append_if_new(vec![
                case("BIOS", "Cold boot"),
                case("BIOS", "Warm boot"),
                case("BIOS", "Warm boot"),
            ])
            .unwrap();

        assert_eq!(added, vec![case("BIOS", "Warm boot")]);
        assert_eq!(store.len(), 2);
        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.snapshot().len(), 2);
    }

    #[test]
    fn test_noop_append_does_not_rewrite_storage() {
        let storage = InMemoryTestCaseStorage::with_records(vec![case("BIOS", "Cold boot")]);
        let handle = storage.clone();
        let mut store = RecordStore::open(Box::new(storage));

        let added = store.append_if_new(vec![case("BIOS", "Cold boot")]).unwrap();
        assert!(added.is_empty());
        assert_eq!(handle.save_count(), 0);

        let added = store.append_if_new(Vec::new()).unwrap();
        assert!(added.is_empty());
        assert_eq!(handle.save_count(), 0);
    }

    #[test]
    fn test_append_is_idempotent() {
        let storage = InMemoryTestCaseStorage::default();
        let handle = storage.clone();
        let mut store = RecordStore::open(Box::new(storage));
        let batch = vec![case("BIOS", "Cold boot"), case("BIOS", "Warm boot")];

        assert_eq!(store.append_if_new(batch.clone()).unwrap().len(), 2);
        assert!(store.append_if_new(batch).unwrap().is_empty());
        assert_eq!(handle.save_count(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unreadable_storage_is_never_overwritten() {
        let mut store = RecordStore::open(Box::new(BrokenStorage));
        let result = store.append_if_new(vec![case("BIOS", "Cold boot")]);

        assert!(matches!(result, Err(DomainError::StorageError(msg)) if msg.contains("refusing")));
        assert!(store.is_empty());
        assert!(store.append_if_new(Vec::new()).unwrap().is_empty());
    }

    struct ReadOnlyStorage;

    impl TestCaseStorage for ReadOnlyStorage {
        fn load(&self) -> DomainResult<Vec<TestCaseRecord>> {
            Ok(Vec::new())
        }

        fn save_all(&self, _records: &[TestCaseRecord]) -> DomainResult<()> {
            Err(DomainError::StorageError("disk full".to_string()))
        }
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let mut store = RecordStore::open(Box::new(ReadOnlyStorage));
        let result = store.append_if_new(vec![case("BIOS", "Cold boot")]);

        assert!(matches!(result, Err(DomainError::StorageError(msg)) if msg == "disk full"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_limit_counts_only_new_records() {
        let storage = InMemoryTestCaseStorage::with_records(vec![case("BIOS", "Old")]);
        let handle = storage.clone();
        let mut store = RecordStore::open(Box::new(storage));

        let added = store
            .append_up_to(
                vec![
                    case("BIOS", "Old"),
                    case("BIOS", "New 1"),
                    case("BIOS", "New 1"),
                    case("BIOS", "New 2"),
                    case("BIOS", "New 3"),
                    case("BIOS", "New 4"),
                ],
                3,
            )
            .unwrap();

        let scenarios: Vec<_> = added.iter().map(|r| r.scenario.as_str()).collect();
        assert_eq!(scenarios, vec!["New 1", "New 2", "New 3"]);
        assert_eq!(store.lookup("BIOS").len(), 4);
        assert_eq!(handle.save_count(), 1);
    }

    #[test]
    fn test_zero_limit_writes_nothing() {
        let storage = InMemoryTestCaseStorage::default();
        let handle = storage.clone();
        let mut store = RecordStore::open(Box::new(storage));

        assert!(store.append_up_to(vec![case("BIOS", "New")], 0).unwrap().is_empty());
        assert_eq!(handle.save_count(), 0);
    }

    #[test]
    fn test_same_fields_different_module_is_not_duplicate() {
        let mut store = RecordStore::open(Box::new(InMemoryTestCaseStorage::with_records(vec![
            case("BIOS", "Cold boot"),
        ])));
        let added = store.append_if_new(vec![case("UEFI", "Cold boot")]).unwrap();
        assert_eq!(added.len(), 1);
        assert!(store.contains(&case("UEFI", "Cold boot")));
    }
}
