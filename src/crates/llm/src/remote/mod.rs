//! Remote LLM provider implementations.
//!
//! One client per [`Provider`]. All of them speak a single-prompt subset of
//! their vendor API; nothing here streams.

pub mod claude;
pub mod gemini;
pub mod grok;
pub mod openai;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use grok::GrokClient;
pub use openai::OpenAiClient;

use crate::chat::ChatModel;
use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::provider::Provider;
use std::sync::Arc;

/// Build the client for `provider` from its configuration.
pub fn build_client(provider: Provider, config: RemoteLlmConfig) -> Result<Arc<dyn ChatModel>> {
    let client: Arc<dyn ChatModel> = match provider {
        Provider::ChatGpt => Arc::new(OpenAiClient::new(config)?),
        Provider::Claude => Arc::new(ClaudeClient::new(config)?),
        Provider::Gemini => Arc::new(GeminiClient::new(config)?),
        Provider::Grok => Arc::new(GrokClient::new(config)?),
    };
    Ok(client)
}

/// Shared reqwest client construction honoring the configured timeout.
pub(crate) fn http_client(config: &RemoteLlmConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}
