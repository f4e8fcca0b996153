//! Structured test case records.

use serde::{Deserialize, Serialize};

/// Field labels in the order the generator is asked to emit them.
pub const TEST_SCENARIO_LABEL: &str = "Test_Scenario";
pub const TEST_STEPS_LABEL: &str = "Test_Steps";
pub const PRE_REQUISITE_LABEL: &str = "Pre_Requisite";
pub const EXPECTED_RESULT_LABEL: &str = "Expected_Result";
pub const PASS_FAIL_CRITERIA_LABEL: &str = "Pass_Fail_Criteria";

/// A test case validating the fix for a defect in `module`.
///
/// Field order matches the column order of the persisted table
/// (`Module, Test_Scenario, Test_Steps, Pre_Requisite, Pass_Fail_Criteria,
/// Expected_Result`). Two records are duplicates iff all six fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestCaseRecord {
    #[serde(rename = "Module", default)]
    pub module: String,
    #[serde(rename = "Test_Scenario", default)]
    pub scenario: String,
    #[serde(rename = "Test_Steps", default)]
    pub steps: String,
    #[serde(rename = "Pre_Requisite", default)]
    pub prerequisite: String,
    #[serde(rename = "Pass_Fail_Criteria", default)]
    pub pass_fail_criteria: String,
    #[serde(rename = "Expected_Result", default)]
    pub expected_result: String,
}

impl TestCaseRecord {
    /// A record is proper when every descriptive field is non-blank.
    pub fn is_proper(&self) -> bool {
        [
            &self.scenario,
            &self.steps,
            &self.prerequisite,
            &self.expected_result,
            &self.pass_fail_criteria,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// The descriptive fields without the module tag.
    pub fn fields(&self) -> TestCaseFields {
        TestCaseFields {
            scenario: self.scenario.clone(),
            steps: self.steps.clone(),
            prerequisite: self.prerequisite.clone(),
            expected_result: self.expected_result.clone(),
            pass_fail_criteria: self.pass_fail_criteria.clone(),
        }
    }
}

/// The five labeled fields extracted from one generated test case block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseFields {
    pub scenario: String,
    pub steps: String,
    pub prerequisite: String,
    pub expected_result: String,
    pub pass_fail_criteria: String,
}

impl TestCaseFields {
    /// Tag the fields with a module to produce a storable record.
    pub fn into_record(self, module: impl Into<String>) -> TestCaseRecord {
        TestCaseRecord {
            module: module.into(),
            scenario: self.scenario,
            steps: self.steps,
            prerequisite: self.prerequisite,
            pass_fail_criteria: self.pass_fail_criteria,
            expected_result: self.expected_result,
        }
    }

    /// Render as labeled lines, the layout used both in prompts and responses.
    pub fn to_labeled_text(&self) -> String {
        format!(
            "{TEST_SCENARIO_LABEL}: {}\n{TEST_STEPS_LABEL}: {}\n{PRE_REQUISITE_LABEL}: {}\n{EXPECTED_RESULT_LABEL}: {}\n{PASS_FAIL_CRITERIA_LABEL}: {}",
            self.scenario, self.steps, self.prerequisite, self.expected_result, self.pass_fail_criteria
        )
    }
}
