//! Grok (xAI) client implementation.
//!
//! Grok uses an OpenAI-compatible API format, so the wire types are shared
//! with [`super::openai`].

use super::openai::{CompletionRequest, CompletionResponse};
use crate::chat::{ChatModel, ChatRequest, ChatResponse};
use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Grok (xAI) API client.
#[derive(Clone)]
pub struct GrokClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl GrokClient {
    /// Create a new Grok client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = super::http_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChatModel for GrokClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = CompletionRequest::from_request(&self.config, &request);

        tracing::debug!(model = %self.config.model, "Requesting Grok completion");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Grok", status, error_text));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion.into_chat_response()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = RemoteLlmConfig::new("test-key", "https://api.grok.ai/v1", "grok-1");
        let client = GrokClient::new(config).unwrap();
        assert_eq!(client.model_name(), "grok-1");
    }

    #[test]
    fn test_request_uses_openai_shape() {
        let config = RemoteLlmConfig::new("test-key", "https://api.grok.ai/v1", "grok-1");
        let body =
            serde_json::to_value(CompletionRequest::from_request(&config, &ChatRequest::new("Hi")))
                .unwrap();
        assert_eq!(body["model"], "grok-1");
        assert_eq!(body["messages"][0]["content"], "Hi");
    }
}
