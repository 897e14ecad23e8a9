//! The LLM invocation port.
//!
//! Workflows talk to models exclusively through [`ChatModel`]. Every failure,
//! whether transport, authentication or an unusable reply, surfaces as an
//! [`LlmError`](crate::LlmError) so callers can treat "this stage failed"
//! uniformly.

use crate::error::{LlmError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single-prompt completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User prompt sent as the only message
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: Option<usize>,
}

impl ChatRequest {
    /// Create a request for the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    /// Set the maximum number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// Text produced by a provider for a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub text: String,
    /// Model that actually served the request
    pub model: String,
    /// Token usage, when the provider reports it
    pub usage: Option<UsageMetadata>,
    /// Provider-specific extras (finish reason, response id, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatResponse {
    /// Create a response carrying only text and model name.
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            usage: None,
            metadata: HashMap::new(),
        }
    }
}

/// Provider-agnostic chat model.
///
/// Implementations convert the request to their vendor format, perform the
/// call and convert the reply back. `complete` is the shorthand the workflows
/// use; it rejects blank replies so an empty argument never reaches a
/// transcript.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Execute a completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model identifier this client is bound to.
    fn model_name(&self) -> &str;

    /// Send a bare prompt and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.chat(ChatRequest::new(prompt)).await?;
        if let Some(usage) = response.usage {
            tracing::debug!(
                model = %response.model,
                total_tokens = usage.total_tokens(),
                metadata = ?response.metadata,
                "Completion received"
            );
        }
        if response.text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(format!(
                "{} returned an empty response",
                self.model_name()
            )));
        }
        Ok(response.text)
    }
}
