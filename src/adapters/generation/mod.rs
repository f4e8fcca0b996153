//! Generation gateway adapters for hosted language models.

pub mod anthropic;
pub mod openai_chat;
pub mod prompts;

pub use anthropic::{AnthropicConfig, AnthropicGenerationGateway};
pub use openai_chat::{OpenAiChatConfig, OpenAiChatGenerationGateway};
