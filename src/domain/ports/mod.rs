//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces the reconciliation core consumes:
//! - RetrievalGateway: nearest defect lookup
//! - GenerationGateway: solutions, explanations and test case text
//! - SimilarityScorer / EmbeddingProvider: semantic comparison
//! - TestCaseStorage: persisted test case table
//! - NotificationSink: out-of-band report delivery

pub mod embedding;
pub mod generation;
pub mod notification;
pub mod retrieval;
pub mod similarity;
pub mod test_case_storage;

pub use embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
pub use generation::{CaseGenerationRequest, GenerationGateway, TEST_CASE_DELIMITER};
pub use notification::NotificationSink;
pub use retrieval::RetrievalGateway;
pub use similarity::SimilarityScorer;
pub use test_case_storage::TestCaseStorage;
