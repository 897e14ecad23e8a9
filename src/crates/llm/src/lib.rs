//! LLM provider port and remote clients for aidebate.
//!
//! The debate and business-idea workflows only need one capability from a
//! language model: send a prompt, get text back, or fail. This crate defines
//! that port as the [`ChatModel`] trait and ships one client per supported
//! vendor.
//!
//! # Providers
//!
//! Each [`Provider`] maps a user-facing identifier to a remote API:
//! - **ChatGPT** - OpenAI chat completions
//! - **Claude** - Anthropic messages API
//! - **Gemini** - Google generateContent
//! - **Grok** - xAI, OpenAI-compatible chat completions
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{ChatModel, Provider, RemoteLlmConfig};
//! use llm::remote::build_client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider: Provider = "claude".parse()?;
//!     let config = RemoteLlmConfig::from_env(
//!         provider.api_key_env(),
//!         provider.default_base_url(),
//!         provider.default_model(),
//!     )?;
//!     let model = build_client(provider, config)?;
//!
//!     let text = model.complete("Argue in favor of: remote work").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod provider;
pub mod remote;

pub use chat::{ChatModel, ChatRequest, ChatResponse, UsageMetadata};
pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use provider::Provider;
