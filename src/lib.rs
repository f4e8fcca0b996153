//! defect-rca - defect root-cause assistant
//!
//! Given a free-text error description, finds the closest known defect,
//! checks that the match is trustworthy, reconciles the module's stored test
//! cases with freshly generated ones, and assembles a solution, explanation
//! and test case list. A self-evaluating controller falls back to a fully
//! generated alternative when no trustworthy match exists.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): record store, parser, formatter, pipeline, controller
//! - **Adapters** (`adapters`): CSV storage, embeddings, retrieval, model backends, report sink
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, HTTP retry, wiring
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use defect_rca::infrastructure::setup::build_controller;
//! use defect_rca::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let mut controller = build_controller(&config).await?;
//!     println!("{}", controller.resolve("BIOS not booting up").await);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, DefectRecord, PipelineConfig, PipelineStage, PipelineState, Resolution, ResponseFormat,
    TestCaseFields, TestCaseRecord,
};
pub use domain::ports::{
    CaseGenerationRequest, EmbeddingProvider, GenerationGateway, NotificationSink,
    RetrievalGateway, SimilarityScorer, TestCaseStorage,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AutonomousController, ReconciliationPipeline, RecordStore, ResponseParser};
