//! Test case table persisted as a headered CSV file.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TestCaseRecord;
use crate::domain::ports::TestCaseStorage;

/// CSV file with columns
/// `Module, Test_Scenario, Test_Steps, Pre_Requisite, Pass_Fail_Criteria, Expected_Result`.
#[derive(Debug, Clone)]
pub struct CsvTestCaseStorage {
    path: PathBuf,
}

impl CsvTestCaseStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "test_cases.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TestCaseStorage for CsvTestCaseStorage {
    fn load(&self) -> DomainResult<Vec<TestCaseRecord>> {
        if !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "test cases file not found, using empty table");
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::None)
            .flexible(true)
            .from_path(&self.path)?;

        // An unreadable header leaves no row trustworthy.
        reader.headers().map_err(|e| {
            DomainError::StorageError(format!(
                "failed to read header of {}: {e}",
                self.path.display()
            ))
        })?;

        let mut records = Vec::new();
        let mut skipped = 0_usize;
        for (index, row) in reader.deserialize::<TestCaseRecord>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                Err(err) => {
                    skipped += 1;
                    tracing::warn!(
                        path = %self.path.display(),
                        row = index + 1,
                        error = %err,
                        "skipping undecodable test case row"
                    );
                }
            }
        }
        if skipped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                loaded = records.len(),
                skipped,
                "test case table partially decoded"
            );
        }
        Ok(records)
    }

    fn save_all(&self, records: &[TestCaseRecord]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        {
            let mut writer = WriterBuilder::new().has_headers(true).from_path(&temp)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "wrote test cases");
        Ok(())
    }
}
