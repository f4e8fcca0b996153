//! Anthropic Messages API generation gateway.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::prompts;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GenerationConfig;
use crate::domain::ports::{CaseGenerationRequest, GenerationGateway};
use crate::infrastructure::http::{GatewayHttpError, RetryPolicy};

/// Configuration for the Anthropic gateway.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (will be read from ANTHROPIC_API_KEY env if not set).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// API version header.
    pub api_version: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for AnthropicConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            model: config.model.clone(),
            api_version: "2023-06-01".to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl AnthropicConfig {
    /// Get API key from config or environment.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

pub struct AnthropicGenerationGateway {
    config: AnthropicConfig,
    client: Client,
    retry: RetryPolicy,
}

impl AnthropicGenerationGateway {
    pub fn new(config: AnthropicConfig, retry: RetryPolicy) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::GenerationFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            retry,
        })
    }

    async fn complete(&self, prompt: &str) -> DomainResult<String> {
        let api_key = self
            .config
            .get_api_key()
            .ok_or_else(|| DomainError::GenerationFailed("ANTHROPIC_API_KEY not set".to_string()))?;

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let text = self
            .retry
            .execute(|| self.send(&api_key, &request))
            .await?;
        Ok(text.trim().to_string())
    }

    async fn send(
        &self,
        api_key: &str,
        request: &MessagesRequest<'_>,
    ) -> Result<String, GatewayHttpError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/messages",
                self.config.base_url.trim_end_matches('/')
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayHttpError::from_status(status, body));
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayHttpError::InvalidResponse(e.to_string()))?;

        let text = result
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(GatewayHttpError::InvalidResponse(
                "response contained no text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerationGateway for AnthropicGenerationGateway {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn solve(&self, error: &str) -> DomainResult<String> {
        self.complete(&prompts::solve(error)).await
    }

    async fn explain(&self, error: &str, solution: &str) -> DomainResult<String> {
        self.complete(&prompts::explain(error, solution)).await
    }

    async fn generate_cases(&self, request: &CaseGenerationRequest) -> DomainResult<String> {
        self.complete(&prompts::generate_cases(request)).await
    }
}
