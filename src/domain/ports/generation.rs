//! Generation gateway port.
//!
//! Solutions, explanations and raw test case text all come from an external
//! language model behind this interface.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::TestCaseRecord;

/// Delimiter the generator is instructed to emit after every test case.
pub const TEST_CASE_DELIMITER: &str = "\n### END TEST CASE ###\n";

/// Inputs for a test case generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseGenerationRequest {
    pub error: String,
    pub solution: String,
    /// Rationale for the solution, when one has been generated.
    pub explanation: Option<String>,
    /// Existing cases the generator must not duplicate.
    pub exclude: Vec<TestCaseRecord>,
    /// Exact number of cases wanted; `None` asks for a comprehensive set.
    pub count: Option<usize>,
}

#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// One-sentence solution for an error.
    async fn solve(&self, error: &str) -> DomainResult<String>;

    /// Free-text rationale for why `solution` fixes `error`.
    async fn explain(&self, error: &str, solution: &str) -> DomainResult<String>;

    /// Raw text holding zero or more test case blocks separated by
    /// [`TEST_CASE_DELIMITER`].
    async fn generate_cases(&self, request: &CaseGenerationRequest) -> DomainResult<String>;
}
