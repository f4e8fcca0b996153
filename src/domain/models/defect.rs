//! Defect reference records.

use serde::{Deserialize, Serialize};

/// A known defect with its accepted solution.
///
/// Loaded once at startup and never mutated; retrieval matches queries
/// against `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub description: String,
    pub solution: String,
    pub module: String,
}

impl DefectRecord {
    pub fn new(
        description: impl Into<String>,
        solution: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            solution: solution.into(),
            module: module.into(),
        }
    }
}
