//! Retrieval, similarity gate and test case reconciliation.
//!
//! One run walks `Retrieve -> Gate -> RequireCount -> GenerateGap? -> Assemble -> Done`.
//! Every stage can end the run in `Error`, and no fault ever reaches the
//! caller: it is folded into the response text instead.

use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::models::{
    DefectRecord, PipelineConfig, PipelineStage, PipelineState, Resolution, TestCaseRecord,
};
use crate::domain::ports::{
    CaseGenerationRequest, GenerationGateway, RetrievalGateway, SimilarityScorer,
};
use crate::services::record_store::RecordStore;
use crate::services::response_format::{fault_message, ResponseFormatter, NOT_FOUND_MESSAGE};
use crate::services::response_parser::ResponseParser;

/// Why a run stopped short of `Done`.
#[derive(Debug)]
enum Halt {
    /// Nothing retrieved, or the match was too weak to trust.
    NotFound(&'static str),
    /// A collaborator failed.
    Fault(DomainError),
}

impl From<DomainError> for Halt {
    fn from(err: DomainError) -> Self {
        Halt::Fault(err)
    }
}

/// Outcome of the gap-fill stage.
struct GapFill {
    added: Vec<TestCaseRecord>,
    explanation: String,
}

pub struct ReconciliationPipeline {
    retrieval: Arc<dyn RetrievalGateway>,
    scorer: Arc<dyn SimilarityScorer>,
    generation: Arc<dyn GenerationGateway>,
    parser: ResponseParser,
    formatter: ResponseFormatter,
    config: PipelineConfig,
}

impl ReconciliationPipeline {
    pub fn new(
        retrieval: Arc<dyn RetrievalGateway>,
        scorer: Arc<dyn SimilarityScorer>,
        generation: Arc<dyn GenerationGateway>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retrieval,
            scorer,
            generation,
            parser: ResponseParser::default(),
            formatter: ResponseFormatter::new(config.response_format),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn formatter(&self) -> &ResponseFormatter {
        &self.formatter
    }

    /// Run one request to a terminal state.
    pub async fn run(&self, store: &mut RecordStore, input: &str) -> PipelineState {
        let mut state = PipelineState::new(input);

        match self.drive(&mut state, store).await {
            Ok(()) => {}
            Err(Halt::NotFound(reason)) => {
                tracing::info!(stage = %state.stage, reason, "defect not found");
                state.fail(NOT_FOUND_MESSAGE);
            }
            Err(Halt::Fault(err)) => {
                tracing::error!(stage = %state.stage, error = %err, "validation/generation error");
                state.fail(fault_message(&err.to_string()));
            }
        }

        state
    }

    async fn drive(&self, state: &mut PipelineState, store: &mut RecordStore) -> Result<(), Halt> {
        // Retrieve
        let defect = self
            .retrieval
            .query(&state.input)
            .await?
            .ok_or(Halt::NotFound("no defect retrieved"))?;
        state.context = Some(defect.clone());

        // Gate
        state.advance(PipelineStage::Gate);
        let score = self.scorer.score(&state.input, &defect.description).await?;
        tracing::info!(score, threshold = self.config.similarity_threshold, "similarity gate");
        if score < self.config.similarity_threshold {
            return Err(Halt::NotFound("similarity below threshold"));
        }

        // RequireCount
        state.advance(PipelineStage::RequireCount);
        let existing = store.lookup(&defect.module);
        let have = existing.len();
        let need = self.config.required_test_cases.saturating_sub(have);
        tracing::info!(module = %defect.module, have, need, "test case count");

        let (test_cases, generated, explanation) = if need == 0 {
            tracing::info!(count = have, "using stored test cases");
            (existing, 0, None)
        } else {
            state.advance(PipelineStage::GenerateGap);
            let fill = self
                .generate_gap(store, &state.input, &defect, &existing, need)
                .await?;
            let generated = fill.added.len();
            let mut combined = existing;
            combined.extend(fill.added);
            (combined, generated, Some(fill.explanation))
        };

        // Assemble
        state.advance(PipelineStage::Assemble);
        let explanation = match explanation {
            Some(explanation) => explanation,
            None => self.generation.explain(&state.input, &defect.solution).await?,
        };
        let response = self
            .formatter
            .resolution(&state.input, &defect.solution, &explanation, &test_cases);

        let error = state.input.clone();
        state.complete(
            response,
            Resolution {
                error,
                solution: defect.solution,
                explanation,
                module: defect.module,
                test_cases,
                generated,
            },
        );
        Ok(())
    }

    /// Generate the missing cases, parse them and store the new ones.
    ///
    /// Returns only the records the store actually accepted.
    async fn generate_gap(
        &self,
        store: &mut RecordStore,
        error: &str,
        defect: &DefectRecord,
        existing: &[TestCaseRecord],
        need: usize,
    ) -> Result<GapFill, DomainError> {
        let have = existing.len();
        let explanation = self.generation.explain(error, &defect.solution).await?;

        let request = CaseGenerationRequest {
            error: error.to_string(),
            solution: defect.solution.clone(),
            explanation: Some(explanation.clone()),
            exclude: existing.to_vec(),
            count: (have > 0).then_some(need),
        };
        let raw = self.generation.generate_cases(&request).await?;

        let candidates: Vec<TestCaseRecord> = self
            .parser
            .parse(&raw)
            .into_iter()
            .map(|fields| fields.into_record(defect.module.as_str()))
            .collect();
        let parsed = candidates.len();

        // Topping up a partial set takes exactly `need` usable, unseen
        // records; a comprehensive set is stored whole.
        let added = if have > 0 {
            let usable: Vec<TestCaseRecord> =
                candidates.into_iter().filter(TestCaseRecord::is_proper).collect();
            store.append_up_to(usable, need)?
        } else {
            store.append_if_new(candidates)?
        };
        tracing::info!(
            existing = have,
            parsed,
            added = added.len(),
            "generated additional test case(s)"
        );

        Ok(GapFill { added, explanation })
    }
}
