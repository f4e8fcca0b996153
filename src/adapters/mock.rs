//! Scripted collaborators for tests and dry runs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DefectRecord;
use crate::domain::ports::{
    CaseGenerationRequest, GenerationGateway, RetrievalGateway, SimilarityScorer,
};

/// A call observed by [`ScriptedGenerationGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationCall {
    Solve,
    Explain,
    GenerateCases(CaseGenerationRequest),
}

/// Scripted reply: text or failure message.
type Reply = Result<String, String>;

/// Generation gateway returning fixed replies and recording every call.
///
/// Clones share the call log.
#[derive(Debug, Clone)]
pub struct ScriptedGenerationGateway {
    solution: Reply,
    explanation: Reply,
    cases: Reply,
    calls: Arc<Mutex<Vec<GenerationCall>>>,
}

impl Default for ScriptedGenerationGateway {
    fn default() -> Self {
        Self {
            solution: Ok("Mock solution.".to_string()),
            explanation: Ok("Mock explanation.".to_string()),
            cases: Ok(String::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ScriptedGenerationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solution(mut self, text: impl Into<String>) -> Self {
        self.solution = Ok(text.into());
        self
    }

    pub fn with_explanation(mut self, text: impl Into<String>) -> Self {
        self.explanation = Ok(text.into());
        self
    }

    pub fn with_cases(mut self, text: impl Into<String>) -> Self {
        self.cases = Ok(text.into());
        self
    }

    pub fn failing_solve(mut self, message: impl Into<String>) -> Self {
        self.solution = Err(message.into());
        self
    }

    pub fn failing_explain(mut self, message: impl Into<String>) -> Self {
        self.explanation = Err(message.into());
        self
    }

    pub fn failing_cases(mut self, message: impl Into<String>) -> Self {
        self.cases = Err(message.into());
        self
    }

    /// Every call in order.
    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Requests passed to `generate_cases`, in order.
    pub fn case_requests(&self) -> Vec<CaseGenerationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GenerationCall::GenerateCases(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn explain_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == GenerationCall::Explain)
            .count()
    }

    fn record(&self, call: GenerationCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn reply(reply: &Reply) -> DomainResult<String> {
        reply
            .clone()
            .map_err(DomainError::GenerationFailed)
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGenerationGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn solve(&self, _error: &str) -> DomainResult<String> {
        self.record(GenerationCall::Solve);
        Self::reply(&self.solution)
    }

    async fn explain(&self, _error: &str, _solution: &str) -> DomainResult<String> {
        self.record(GenerationCall::Explain);
        Self::reply(&self.explanation)
    }

    async fn generate_cases(&self, request: &CaseGenerationRequest) -> DomainResult<String> {
        self.record(GenerationCall::GenerateCases(request.clone()));
        Self::reply(&self.cases)
    }
}

/// Retrieval gateway with a fixed answer.
#[derive(Debug, Clone)]
pub struct StaticRetrievalGateway {
    answer: Result<Option<DefectRecord>, String>,
    queries: Arc<AtomicUsize>,
}

impl StaticRetrievalGateway {
    pub fn returning(defect: DefectRecord) -> Self {
        Self::with_answer(Ok(Some(defect)))
    }

    pub fn empty() -> Self {
        Self::with_answer(Ok(None))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_answer(Err(message.into()))
    }

    fn with_answer(answer: Result<Option<DefectRecord>, String>) -> Self {
        Self {
            answer,
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RetrievalGateway for StaticRetrievalGateway {
    async fn query(&self, _text: &str) -> DomainResult<Option<DefectRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(DomainError::RetrievalFailed)
    }
}

/// Scorer that returns the same score for any non-blank pair.
#[derive(Debug, Clone, Copy)]
pub struct FixedSimilarityScorer {
    score: f64,
}

impl FixedSimilarityScorer {
    pub fn new(score: f64) -> Self {
        Self { score }
    }
}

#[async_trait]
impl SimilarityScorer for FixedSimilarityScorer {
    async fn score(&self, a: &str, b: &str) -> DomainResult<f64> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Ok(0.0);
        }
        Ok(self.score)
    }
}
