//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use defect_rca::adapters::csv::CsvTestCaseStorage;
use defect_rca::domain::ports::TestCaseStorage;
use defect_rca::TestCaseRecord;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A proper test case record.
pub fn case(module: &str, scenario: &str) -> TestCaseRecord {
    TestCaseRecord {
        module: module.to_string(),
        scenario: scenario.to_string(),
        steps: "1. Apply the fix\n2. Reboot the unit".to_string(),
        prerequisite: "Affected unit on the bench".to_string(),
        pass_fail_criteria: "Symptom does not reappear".to_string(),
        expected_result: "Unit reaches the OS".to_string(),
    }
}

/// One well-formed generated block, delimiter included.
pub fn block(scenario: &str) -> String {
    format!(
        "Test_Scenario: {scenario}\nTest_Steps: Boot the unit\nPre_Requisite: Fix applied\nExpected_Result: Boots cleanly\nPass_Fail_Criteria: No hang within 60s\n### END TEST CASE ###\n"
    )
}

/// Write a defects table with the given `(module, description, solution)` rows.
pub fn write_defects(dir: &Path, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join("defects.csv");
    let mut writer = csv::Writer::from_path(&path).expect("Failed to create defects.csv");
    writer
        .write_record(["Module", "Description", "Solution"])
        .expect("Failed to write header");
    for (module, description, solution) in rows {
        writer
            .write_record([*module, *description, *solution])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush defects.csv");
    path
}

/// Persist `records` as the test case table and return its path.
pub fn write_test_cases(dir: &Path, records: &[TestCaseRecord]) -> PathBuf {
    let path = dir.join("test_cases.csv");
    CsvTestCaseStorage::new(&path)
        .save_all(records)
        .expect("Failed to write test_cases.csv");
    path
}
