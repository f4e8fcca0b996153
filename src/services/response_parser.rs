//! Fixed-grammar extraction of test cases from generated text.
//!
//! Generated text is a sequence of blocks separated by a delimiter line.
//! Inside a block every field starts with `Label:` and runs until the next
//! recognised label or the end of the block. Missing labels yield empty
//! values; a block without a scenario is dropped.

use crate::domain::models::test_case::{
    EXPECTED_RESULT_LABEL, PASS_FAIL_CRITERIA_LABEL, PRE_REQUISITE_LABEL, TEST_SCENARIO_LABEL,
    TEST_STEPS_LABEL,
};
use crate::domain::models::TestCaseFields;
use crate::domain::ports::TEST_CASE_DELIMITER;

const LABELS: [&str; 5] = [
    TEST_SCENARIO_LABEL,
    TEST_STEPS_LABEL,
    PRE_REQUISITE_LABEL,
    EXPECTED_RESULT_LABEL,
    PASS_FAIL_CRITERIA_LABEL,
];

#[derive(Debug, Clone)]
pub struct ResponseParser {
    separator: String,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(TEST_CASE_DELIMITER)
    }
}

impl ResponseParser {
    /// Split on `separator`. Surrounding whitespace of the separator is not
    /// significant, so a final block without a trailing newline still splits.
    pub fn new(separator: &str) -> Self {
        let trimmed = separator.trim();
        Self {
            separator: if trimmed.is_empty() {
                separator.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    /// Extract every usable block from a full generator response.
    pub fn parse(&self, raw_text: &str) -> Vec<TestCaseFields> {
        let mut parsed = Vec::new();
        let mut dropped = 0_usize;

        for segment in self.segments(raw_text) {
            let fields = extract_fields(segment);
            if fields.scenario.is_empty() {
                dropped += 1;
                continue;
            }
            parsed.push(fields);
        }

        if dropped > 0 {
            tracing::debug!(dropped, "discarded generated segments without a scenario");
        }
        parsed
    }

    /// Non-empty, trimmed segments between separators.
    pub fn segments<'a>(&self, raw_text: &'a str) -> Vec<&'a str> {
        if self.separator.is_empty() {
            let trimmed = raw_text.trim();
            return if trimmed.is_empty() { Vec::new() } else { vec![trimmed] };
        }

        raw_text
            .split(self.separator.as_str())
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

/// Extract the five labeled fields from a single block.
///
/// Each value spans from just after its label's colon up to the next
/// recognised label (or the end of the block), trimmed. Only the first
/// occurrence of a label is used.
pub fn extract_fields(segment: &str) -> TestCaseFields {
    // (label start, value start, label index) for every label occurrence.
    let mut marks: Vec<(usize, usize, usize)> = Vec::new();
    for (index, label) in LABELS.iter().enumerate() {
        let needle = format!("{label}:");
        for (start, matched) in segment.match_indices(needle.as_str()) {
            marks.push((start, start + matched.len(), index));
        }
    }
    marks.sort_unstable();

    let mut values: [String; 5] = Default::default();
    let mut filled = [false; 5];
    for &(_, value_start, index) in &marks {
        if filled[index] {
            continue;
        }
        filled[index] = true;

        let value_end = marks
            .iter()
            .map(|&(start, _, _)| start)
            .find(|&start| start >= value_start)
            .unwrap_or(segment.len());
        values[index] = segment[value_start..value_end].trim().to_string();
    }

    let [scenario, steps, prerequisite, expected_result, pass_fail_criteria] = values;
    TestCaseFields {
        scenario,
        steps,
        prerequisite,
        expected_result,
        pass_fail_criteria,
    }
}
