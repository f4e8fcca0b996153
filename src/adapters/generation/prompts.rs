//! Prompt texts sent to the generation backends.

use crate::domain::models::TestCaseRecord;
use crate::domain::ports::CaseGenerationRequest;

const DELIMITER: &str = "### END TEST CASE ###";

const REQUIRED_FIELDS: &str = "Each test case MUST include:
Test_Scenario:
Test_Steps:
Pre_Requisite:
Expected_Result:
Pass_Fail_Criteria:";

/// Ask for a short, standalone fix.
pub fn solve(error: &str) -> String {
    format!(
        "Provide a concise, actionable solution for the following error:
Error: {error}
Ensure that the solution is clear and does not include any follow-up questions."
    )
}

pub fn explain(error: &str, solution: &str) -> String {
    format!(
        "Explain why this solution fixes the following error:
Error: {error}
Solution: {solution}"
    )
}

/// Test case prompt for the three request shapes: gap fill (count and
/// exclusions), exact count, and a comprehensive set.
pub fn generate_cases(request: &CaseGenerationRequest) -> String {
    let mut prompt = match request.count {
        Some(count) if !request.exclude.is_empty() => format!(
            "Generate {count} additional comprehensive test case(s) to fully validate the following defect solution end-to-end."
        ),
        Some(count) => format!(
            "Given the error and the solution below, generate EXACTLY {count} structured test cases."
        ),
        None => "Generate a comprehensive set of test cases to fully validate the following defect solution end-to-end.".to_string(),
    };

    prompt.push_str(&format!("\nError: {}\nSolution: {}", request.error, request.solution));
    if let Some(explanation) = &request.explanation {
        prompt.push_str(&format!("\nExplanation: {explanation}"));
    }

    if !request.exclude.is_empty() {
        prompt.push_str(
            "\nEnsure that these test cases do not duplicate the following existing test cases:\n",
        );
        prompt.push_str(&existing_cases(&request.exclude));
    }

    prompt.push('\n');
    prompt.push_str(REQUIRED_FIELDS);
    prompt.push_str(&format!(
        "\nEnd each test case with the delimiter \"{DELIMITER}\" on its own line."
    ));
    prompt
}

fn existing_cases(records: &[TestCaseRecord]) -> String {
    records
        .iter()
        .map(|record| record.fields().to_labeled_text())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> TestCaseRecord {
        TestCaseRecord {
            module: "BIOS".to_string(),
            scenario: "Cold boot".to_string(),
            steps: "Power on".to_string(),
            prerequisite: "Unit on bench".to_string(),
            pass_fail_criteria: "POST passes".to_string(),
            expected_result: "Boot menu".to_string(),
        }
    }

    #[test]
    fn test_gap_fill_prompt_lists_exclusions() {
        let prompt = generate_cases(&CaseGenerationRequest {
            error: "BIOS not booting up".to_string(),
            solution: "Reflash".to_string(),
            explanation: Some("Image was corrupt".to_string()),
            exclude: vec![existing()],
            count: Some(3),
        });
        assert!(prompt.starts_with("Generate 3 additional"));
        assert!(prompt.contains("Explanation: Image was corrupt"));
        assert!(prompt.contains("do not duplicate"));
        assert!(prompt.contains("Test_Scenario: Cold boot"));
        assert!(prompt.contains("### END TEST CASE ###"));
    }

    #[test]
    fn test_exact_count_prompt_without_explanation() {
        let prompt = generate_cases(&CaseGenerationRequest {
            error: "e".to_string(),
            solution: "s".to_string(),
            count: Some(4),
            ..Default::default()
        });
        assert!(prompt.contains("EXACTLY 4"));
        assert!(!prompt.contains("Explanation:"));
        assert!(!prompt.contains("do not duplicate"));
    }

    #[test]
    fn test_comprehensive_prompt() {
        let prompt = generate_cases(&CaseGenerationRequest {
            error: "e".to_string(),
            solution: "s".to_string(),
            explanation: Some("x".to_string()),
            ..Default::default()
        });
        assert!(prompt.starts_with("Generate a comprehensive set"));
        assert!(prompt.contains("Pass_Fail_Criteria:"));
    }

    #[test]
    fn test_solve_and_explain_embed_inputs() {
        assert!(solve("disk full").contains("Error: disk full"));
        let prompt = explain("disk full", "delete logs");
        assert!(prompt.contains("Error: disk full\nSolution: delete logs"));
    }
}
