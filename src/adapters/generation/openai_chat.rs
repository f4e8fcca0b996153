//! OpenAI-compatible chat completions gateway.
//!
//! Works against OpenAI and any server speaking the same protocol
//! (Groq, vLLM, Ollama) through `base_url`.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::prompts;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GenerationConfig;
use crate::domain::ports::{CaseGenerationRequest, GenerationGateway};
use crate::infrastructure::http::{GatewayHttpError, RetryPolicy};

#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// Falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for OpenAiChatConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl OpenAiChatConfig {
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiChatGenerationGateway {
    config: OpenAiChatConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAiChatGenerationGateway {
    pub fn new(config: OpenAiChatConfig, retry: RetryPolicy) -> DomainResult<Self> {
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
            .ok_or_else(|| DomainError::GenerationFailed("OPENAI_API_KEY not set".to_string()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let text = self
            .retry
            .execute(|| self.send(&api_key, &request))
            .await?;
        Ok(text.trim().to_string())
    }

    async fn send(&self, api_key: &str, request: &ChatRequest<'_>) -> Result<String, GatewayHttpError> {
        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayHttpError::from_status(status, body));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayHttpError::InvalidResponse(e.to_string()))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GatewayHttpError::InvalidResponse("response contained no text".to_string()))
    }
}

#[async_trait]
impl GenerationGateway for OpenAiChatGenerationGateway {
    fn name(&self) -> &'static str {
        "openai"
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
