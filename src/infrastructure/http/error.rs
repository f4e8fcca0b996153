use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors from an HTTP call to a model provider.
#[derive(Error, Debug)]
pub enum GatewayHttpError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or rejected API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// 5xx from the provider
    #[error("API server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// Provider reports it is overloaded (Anthropic 529)
    #[error("API server overloaded")]
    Overloaded,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GatewayHttpError {
    /// Whether the call may succeed if repeated.
    ///
    /// Rate limits, server errors, overload and connection-level failures
    /// are transient. Everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded | Self::ServerError { .. } | Self::Overloaded => true,
            Self::NetworkError(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            _ => false,
        }
    }

    /// Map an HTTP error status and body to an error variant.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 | 404 | 422 => Self::InvalidRequest(body),
            401 | 403 => Self::AuthenticationFailed(body),
            429 => Self::RateLimitExceeded,
            529 => Self::Overloaded,
            code @ 500..=599 => Self::ServerError { status: code, body },
            _ => Self::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}

impl From<GatewayHttpError> for DomainError {
    fn from(err: GatewayHttpError) -> Self {
        DomainError::GenerationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            GatewayHttpError::from_status(StatusCode::BAD_REQUEST, "bad".to_string()),
            GatewayHttpError::InvalidRequest(_)
        ));
        assert!(matches!(
            GatewayHttpError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            GatewayHttpError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            GatewayHttpError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            GatewayHttpError::RateLimitExceeded
        ));
        assert!(matches!(
            GatewayHttpError::from_status(StatusCode::BAD_GATEWAY, String::new()),
            GatewayHttpError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            GatewayHttpError::from_status(StatusCode::from_u16(529).unwrap(), String::new()),
            GatewayHttpError::Overloaded
        ));
        assert!(matches!(
            GatewayHttpError::from_status(StatusCode::IM_A_TEAPOT, String::new()),
            GatewayHttpError::Unknown(_)
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(GatewayHttpError::RateLimitExceeded.is_transient());
        assert!(GatewayHttpError::Overloaded.is_transient());
        assert!(GatewayHttpError::ServerError { status: 500, body: String::new() }.is_transient());
        assert!(!GatewayHttpError::AuthenticationFailed("no key".to_string()).is_transient());
        assert!(!GatewayHttpError::InvalidResponse("empty".to_string()).is_transient());
    }

    #[test]
    fn test_converts_to_generation_failure() {
        let err: DomainError = GatewayHttpError::RateLimitExceeded.into();
        assert_eq!(err.to_string(), "Generation failed: Rate limit exceeded");
    }
}
