//! Defect embeddings from an OpenAI-compatible `/embeddings` endpoint.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
use crate::infrastructure::http::{GatewayHttpError, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Largest input list the endpoint accepts in one request.
const MAX_INPUTS_PER_REQUEST: usize = 2048;

#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// Falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
    pub max_batch_size: usize,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self::from(&EmbeddingConfig {
            dimension: 1536,
            ..EmbeddingConfig::default()
        })
    }
}

impl From<&EmbeddingConfig> for OpenAiEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            max_batch_size: MAX_INPUTS_PER_REQUEST,
        }
    }
}

impl OpenAiEmbeddingConfig {
    fn api_key(&self) -> DomainResult<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| DomainError::EmbeddingFailed("OPENAI_API_KEY not set".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig, retry: RetryPolicy) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::EmbeddingFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            retry,
        })
    }

    /// Embed `texts` in one request, returning vectors in input order.
    async fn embed_texts(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        let api_key = self.config.api_key()?;
        let request = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let vectors = self
            .retry
            .execute(|| self.send(&api_key, &request))
            .await
            .map_err(|e| DomainError::EmbeddingFailed(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    async fn send(
        &self,
        api_key: &str,
        request: &EmbeddingsRequest<'_>,
    ) -> Result<Vec<Vec<f32>>, GatewayHttpError> {
        let response = self
            .client
            .post(format!(
                "{}/embeddings",
                self.config.base_url.trim_end_matches('/')
            ))
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayHttpError::from_status(status, body));
        }

        let mut result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| GatewayHttpError::InvalidResponse(e.to_string()))?;
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.embed_texts(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| DomainError::EmbeddingFailed("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        let mut outputs = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(self.config.max_batch_size.max(1)) {
            let texts: Vec<String> = chunk.iter().map(|input| input.text.clone()).collect();
            let vectors = self.embed_texts(&texts).await?;
            outputs.extend(chunk.iter().zip(vectors).map(|(input, vector)| EmbeddingOutput {
                id: input.id.clone(),
                vector,
            }));
        }
        tracing::debug!(count = outputs.len(), "embedded batch");
        Ok(outputs)
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(server: &mockito::ServerGuard, max_batch_size: usize) -> OpenAiEmbeddingProvider {
        OpenAiEmbeddingProvider::new(
            OpenAiEmbeddingConfig {
                api_key: Some("test-key".to_string()),
                base_url: server.url(),
                dimension: 2,
                max_batch_size,
                ..Default::default()
            },
            RetryPolicy::new(1, 1, 2),
        )
        .unwrap()
    }

    fn input(id: &str, text: &str) -> EmbeddingInput {
        EmbeddingInput {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_from_embedding_config() {
        let config = OpenAiEmbeddingConfig::from(&EmbeddingConfig {
            base_url: Some("http://localhost:8080/v1".to_string()),
            dimension: 384,
            ..EmbeddingConfig::default()
        });
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.dimension, 384);
        assert_eq!(config.max_batch_size, MAX_INPUTS_PER_REQUEST);

        assert_eq!(OpenAiEmbeddingConfig::default().base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_batch_restores_input_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[0.0,1.0],"index":1},{"embedding":[1.0,0.0],"index":0}]}"#)
            .create_async()
            .await;

        let outputs = provider_for(&server, 16)
            .embed_batch(&[input("first", "a"), input("second", "b")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outputs[0].id, "first");
        assert_eq!(outputs[0].vector, vec![1.0, 0.0]);
        assert_eq!(outputs[1].vector, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_batch_is_split_into_chunks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[1.0,0.0],"index":0}]}"#)
            .expect(2)
            .create_async()
            .await;

        let outputs = provider_for(&server, 1)
            .embed_batch(&[input("a", "x"), input("b", "y")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].id, "b");
    }

    #[tokio::test]
    async fn test_short_response_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let result = provider_for(&server, 16).embed("a").await;
        assert!(matches!(result, Err(DomainError::EmbeddingFailed(msg)) if msg.contains("expected 1")));
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .with_status(401)
            .with_body("bad key")
            .expect(1)
            .create_async()
            .await;

        let result = provider_for(&server, 16).embed("a").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(DomainError::EmbeddingFailed(msg)) if msg.contains("bad key")));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .with_status(502)
            .expect(2)
            .create_async()
            .await;

        let result = provider_for(&server, 16).embed("a").await;

        mock.assert_async().await;
        assert!(result.is_err());
    }
}
