//! Defect reference data loaded from CSV.

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;

use crate::domain::errors::DomainResult;
use crate::domain::models::DefectRecord;

#[derive(Debug, Deserialize)]
struct DefectRow {
    #[serde(rename = "Module", default)]
    module: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Solution", default)]
    solution: String,
}

/// Read defects from a CSV with `Module, Description, Solution` columns.
///
/// Rows without a description or solution, or that cannot be decoded, are skipped.
pub fn load_defects(path: &Path) -> DomainResult<Vec<DefectRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut defects = Vec::new();
    let mut skipped = 0_usize;
    for (index, row) in reader.deserialize::<DefectRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    row = index + 1,
                    error = %err,
                    "skipping undecodable defect row"
                );
                skipped += 1;
                continue;
            }
        };
        if row.description.is_empty() || row.solution.is_empty() {
            skipped += 1;
            continue;
        }
        defects.push(DefectRecord::new(row.description, row.solution, row.module));
    }

    tracing::info!(path = %path.display(), loaded = defects.len(), skipped, "loaded defects");
    Ok(defects)
}
