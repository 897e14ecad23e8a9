//! Supported provider identifiers.

use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported LLM vendor, selected by a case-insensitive identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provider {
    ChatGpt,
    Claude,
    Gemini,
    Grok,
}

impl Provider {
    /// All providers, in display order.
    pub const ALL: [Provider; 4] = [
        Provider::ChatGpt,
        Provider::Claude,
        Provider::Gemini,
        Provider::Grok,
    ];

    /// User-facing identifier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "ChatGPT",
            Provider::Claude => "Claude",
            Provider::Gemini => "Gemini",
            Provider::Grok => "Grok",
        }
    }

    /// Lowercase key used in configuration tables.
    pub fn config_key(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "chatgpt",
            Provider::Claude => "claude",
            Provider::Gemini => "gemini",
            Provider::Grok => "grok",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "OPENAI_API_KEY",
            Provider::Claude => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GOOGLE_GEMINI_API_KEY",
            Provider::Grok => "GROK_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "https://api.openai.com/v1",
            Provider::Claude => "https://api.anthropic.com",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::Grok => "https://api.grok.ai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "gpt-4",
            Provider::Claude => "claude-3-opus-20240229",
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Grok => "grok-1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.config_key() == wanted)
            .ok_or_else(|| LlmError::UnknownProvider(s.to_string()))
    }
}

impl TryFrom<String> for Provider {
    type Error = LlmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.display_name().to_string()
    }
}
