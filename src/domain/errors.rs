//! Domain errors for defect root-cause analysis.

use thiserror::Error;

/// Faults raised by collaborators of the reconciliation pipeline.
///
/// None of these escape the pipeline boundary; they are folded into the
/// textual error response instead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Retrieval failed: {0}")]
    RetrievalFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for DomainError {
    fn from(err: csv::Error) -> Self {
        DomainError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: DomainError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, DomainError::StorageError(_)));
        assert_eq!(err.to_string(), "Storage error: read-only");
    }

    #[test]
    fn test_display_includes_cause() {
        let err = DomainError::GenerationFailed("timeout".to_string());
        assert_eq!(err.to_string(), "Generation failed: timeout");
    }
}
