//! Per-request pipeline state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::defect::DefectRecord;
use super::test_case::TestCaseRecord;

/// Stages of the reconciliation state machine.
///
/// `Error` is absorbing and reachable from every other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Retrieve,
    Gate,
    RequireCount,
    GenerateGap,
    Assemble,
    Done,
    Error,
}

impl PipelineStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Gate => "gate",
            Self::RequireCount => "require_count",
            Self::GenerateGap => "generate_gap",
            Self::Assemble => "assemble",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the assemble stage combined into a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub error: String,
    pub solution: String,
    pub explanation: String,
    pub module: String,
    pub test_cases: Vec<TestCaseRecord>,
    /// How many of `test_cases` were generated and stored during this run.
    pub generated: usize,
}

/// Working state for a single request.
///
/// Created fresh per request, advanced stage by stage and discarded once
/// the response has been handed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub input: String,
    pub context: Option<DefectRecord>,
    pub response: String,
    pub stage: PipelineStage,
    pub resolution: Option<Resolution>,
}

impl PipelineState {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            context: None,
            response: String::new(),
            stage: PipelineStage::Retrieve,
            resolution: None,
        }
    }

    pub fn advance(&mut self, stage: PipelineStage) {
        tracing::trace!(from = %self.stage, to = %stage, "pipeline transition");
        self.stage = stage;
    }

    /// Terminate in `Error` with a fixed-format response.
    pub fn fail(&mut self, response: impl Into<String>) {
        self.advance(PipelineStage::Error);
        self.response = response.into();
        self.resolution = None;
    }

    /// Terminate in `Done` with the assembled response.
    pub fn complete(&mut self, response: String, resolution: Resolution) {
        self.advance(PipelineStage::Done);
        self.response = response;
        self.resolution = Some(resolution);
    }

    pub fn succeeded(&self) -> bool {
        self.stage == PipelineStage::Done
    }
}
