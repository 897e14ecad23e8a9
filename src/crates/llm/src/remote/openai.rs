//! OpenAI client implementation.
//!
//! Backs the `ChatGPT` provider with the chat completions endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatModel, RemoteLlmConfig};
//!
//! let config = RemoteLlmConfig::from_env(
//!     "OPENAI_API_KEY",
//!     "https://api.openai.com/v1",
//!     "gpt-4"
//! )?;
//! let client = OpenAiClient::new(config)?;
//! let text = client.complete("Argue against: four-day weeks").await?;
//! ```

use crate::chat::{ChatModel, ChatRequest, ChatResponse, UsageMetadata};
use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = super::http_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = CompletionRequest::from_request(&self.config, &request);

        tracing::debug!(model = %self.config.model, "Requesting OpenAI completion");
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
            return Err(LlmError::from_status("OpenAI", status, error_text));
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

// Chat-completions wire types, shared with the OpenAI-compatible Grok client.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    stream: bool,
}

impl CompletionRequest {
    pub(crate) fn from_request(config: &RemoteLlmConfig, request: &ChatRequest) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![CompletionMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
            max_tokens: request.max_tokens.or(config.max_tokens),
            stream: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CompletionMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    model: String,
    choices: Vec<CompletionChoice>,
    usage: Option<CompletionUsage>,
}

impl CompletionResponse {
    pub(crate) fn into_chat_response(self) -> Result<ChatResponse> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".into()))?;

        let mut response = ChatResponse::new(choice.message.content.unwrap_or_default(), self.model);
        response.usage = self
            .usage
            .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens));
        if let Some(reason) = choice.finish_reason {
            response
                .metadata
                .insert("finish_reason".to_string(), serde_json::Value::String(reason));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}
