//! Application services: the reconciliation pipeline and its collaborators.

pub mod autonomous_controller;
pub mod reconciliation_pipeline;
pub mod record_store;
pub mod response_format;
pub mod response_parser;
pub mod similarity;

pub use autonomous_controller::{self_evaluate, AutonomousController};
pub use reconciliation_pipeline::ReconciliationPipeline;
pub use record_store::RecordStore;
pub use response_format::ResponseFormatter;
pub use response_parser::ResponseParser;
pub use similarity::{cosine_similarity, EmbeddingSimilarityScorer};
