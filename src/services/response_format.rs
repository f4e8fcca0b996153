//! Response assembly in markdown or HTML.

use crate::domain::models::test_case::{
    EXPECTED_RESULT_LABEL, PASS_FAIL_CRITERIA_LABEL, PRE_REQUISITE_LABEL, TEST_SCENARIO_LABEL,
    TEST_STEPS_LABEL,
};
use crate::domain::models::{ResponseFormat, TestCaseRecord};

/// Fixed response when no trustworthy defect matches the input.
pub const NOT_FOUND_MESSAGE: &str = "**Error**: The defect could not be found in the database.";

/// Marker identifying a not-found response.
pub const NOT_FOUND_MARKER: &str = "**Error**:";

/// Response for a fault caught at the pipeline boundary.
pub fn fault_message(description: &str) -> String {
    format!("Error processing request: {description}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter {
    format: ResponseFormat,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Combine error, solution, explanation and test cases into one response.
    pub fn resolution(
        &self,
        error: &str,
        solution: &str,
        explanation: &str,
        test_cases: &[TestCaseRecord],
    ) -> String {
        match self.format {
            ResponseFormat::Markdown => {
                let cases = test_cases
                    .iter()
                    .map(|record| record.fields().to_labeled_text())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                format!(
                    "**Error:**\n{error}\n\n**Solution:**\n{solution}\n\n**Explanation:**\n{explanation}\n\n**Test Cases:**\n{cases}"
                )
            }
            ResponseFormat::Html => {
                let cases = test_cases
                    .iter()
                    .map(html_test_case)
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "<h2>Error:</h2><p>{}</p><h2>Solution:</h2><p>{}</p><h2>Explanation:</h2><p>{}</p><h2>Test Cases:</h2>{cases}",
                    escape_html(error),
                    escape_html(solution),
                    escape_html(explanation),
                )
            }
        }
    }

    /// Response for the alternative-solution path. The generated test case
    /// text is passed through unparsed.
    pub fn alternative(&self, solution: &str, test_cases_text: &str) -> String {
        match self.format {
            ResponseFormat::Markdown => format!(
                "**Alternative Solution (Generated):**\n{solution}\n\n**Test Cases for Alternative Solution:**\n{test_cases_text}"
            ),
            ResponseFormat::Html => format!(
                "<h2>Alternative Solution (Generated):</h2><p>{}</p><h2>Test Cases for Alternative Solution:</h2><pre>{}</pre>",
                escape_html(solution),
                escape_html(test_cases_text),
            ),
        }
    }
}

fn html_test_case(record: &TestCaseRecord) -> String {
    format!(
        "<p><strong>{TEST_SCENARIO_LABEL}:</strong> {}<br><strong>{TEST_STEPS_LABEL}:</strong> {}<br><strong>{PRE_REQUISITE_LABEL}:</strong> {}<br><strong>{EXPECTED_RESULT_LABEL}:</strong> {}<br><strong>{PASS_FAIL_CRITERIA_LABEL}:</strong> {}</p>",
        escape_html(&record.scenario),
        escape_html(&record.steps),
        escape_html(&record.prerequisite),
        escape_html(&record.expected_result),
        escape_html(&record.pass_fail_criteria),
    )
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Wrap a response body in a standalone HTML document for delivery.
pub fn html_document(body: &str) -> String {
    format!(
        r#"<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; padding: 10px; }}
      h2 {{ color: #2E86C1; border-bottom: 1px solid #ccc; padding-bottom: 5px; }}
      p {{ margin: 10px 0; }}
    </style>
  </head>
  <body>
    {body}
  </body>
</html>"#
    )
}
