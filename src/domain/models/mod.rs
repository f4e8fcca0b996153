//! Domain models

pub mod config;
pub mod defect;
pub mod pipeline;
pub mod test_case;

pub use config::{
    Config, EmbeddingConfig, GenerationConfig, LogFormat, LoggingConfig, NotificationConfig,
    PipelineConfig, ResponseFormat, RetryConfig, RotationPolicy, StorageConfig,
};
pub use defect::DefectRecord;
pub use pipeline::{PipelineStage, PipelineState, Resolution};
pub use test_case::{TestCaseFields, TestCaseRecord};
