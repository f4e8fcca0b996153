//! Self-evaluating wrapper around the reconciliation pipeline.
//!
//! The controller runs the pipeline, rates the response, and swaps in a
//! freshly generated alternative solution when the rating is too low.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::PipelineConfig;
use crate::domain::ports::{CaseGenerationRequest, GenerationGateway};
use crate::services::reconciliation_pipeline::ReconciliationPipeline;
use crate::services::record_store::RecordStore;
use crate::services::response_format::{fault_message, NOT_FOUND_MARKER};

/// Marker the generator emits after each test case; its presence signals
/// a structured answer.
const CASE_MARKER: &str = "### END TEST CASE ###";

/// Number of test cases requested for an alternative solution.
pub const ALTERNATIVE_TEST_CASES: usize = 4;

pub const RATING_HIGH: u8 = 5;
pub const RATING_MEDIUM: u8 = 3;
pub const RATING_LOW: u8 = 1;

/// Rate a response on a 1-5 scale.
pub fn self_evaluate(response: &str) -> u8 {
    if response.contains(CASE_MARKER) {
        RATING_HIGH
    } else if response.contains(NOT_FOUND_MARKER) {
        RATING_LOW
    } else {
        RATING_MEDIUM
    }
}

/// Owns the record store and serves one request at a time.
pub struct AutonomousController {
    pipeline: ReconciliationPipeline,
    generation: Arc<dyn GenerationGateway>,
    store: RecordStore,
}

impl AutonomousController {
    pub fn new(
        pipeline: ReconciliationPipeline,
        generation: Arc<dyn GenerationGateway>,
        store: RecordStore,
    ) -> Self {
        Self {
            pipeline,
            generation,
            store,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    /// Resolve an error description into a response.
    ///
    /// Every path decides on the first iteration: a low rating returns the
    /// alternative, anything else returns the pipeline response. The
    /// iteration cap therefore never comes into play.
    #[allow(clippy::never_loop)]
    pub async fn resolve(&mut self, error_text: &str) -> String {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("resolve", %run_id);
        let error = error_text.trim().to_string();

        async move {
            let max_iterations = self.config().max_iterations;
            let rating_threshold = self.config().rating_threshold;
            let mut response = String::new();

            for iteration in 1..=max_iterations {
                tracing::info!(iteration, error = %error, "processing error");
                let state = self.pipeline.run(&mut self.store, &error).await;
                response = state.response;
                tracing::debug!(stage = %state.stage, response = %response, "agent response");

                let rating = self_evaluate(&response);
                tracing::info!(rating, "auto-evaluated rating");
                if rating < rating_threshold {
                    tracing::info!("rating below threshold, generating alternative solution");
                    return self.alternative_or_fault(&error).await;
                }
                return response;
            }

            tracing::info!("max iterations reached, returning last response");
            response
        }
        .instrument(span)
        .await
    }

    async fn alternative_or_fault(&self, error: &str) -> String {
        match self.alternative_solution(error).await {
            Ok(response) => {
                tracing::info!("alternative response generated");
                response
            }
            Err(err) => {
                tracing::error!(error = %err, "alternative solution failed");
                fault_message(&err.to_string())
            }
        }
    }

    /// Generate a solution from scratch, ignoring storage entirely.
    pub async fn alternative_solution(&self, error: &str) -> DomainResult<String> {
        let solution = self.generation.solve(error).await?;
        let request = CaseGenerationRequest {
            error: error.to_string(),
            solution: solution.clone(),
            explanation: None,
            exclude: Vec::new(),
            count: Some(ALTERNATIVE_TEST_CASES),
        };
        let test_cases = self.generation.generate_cases(&request).await?;

        Ok(self.pipeline.formatter().alternative(&solution, &test_cases))
    }
}
