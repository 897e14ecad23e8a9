//! Provider registry and per-job role bindings
//!
//! The registry is built once at startup from [`ServerConfig`]. A provider
//! whose API key is absent is simply not registered, so selecting it fails
//! when the job is requested rather than halfway through the run.

use llm::remote::build_client;
use llm::{ChatModel, Provider, RemoteLlmConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ProviderConfig, ServerConfig};
use crate::{EngineError, Result};

/// Environment variable overriding the Grok endpoint.
const GROK_API_URL_ENV: &str = "GROK_API_URL";

/// A provider resolved to a live model for one workflow role.
#[derive(Clone)]
pub struct RoleBinding {
    pub provider: Provider,
    pub model: Arc<dyn ChatModel>,
}

impl RoleBinding {
    /// Send `prompt` and return the reply, tagging failures with `stage`.
    pub async fn call(&self, prompt: &str, stage: impl Into<String>) -> Result<String> {
        self.model
            .complete(prompt)
            .await
            .map_err(|source| EngineError::StageFailed {
                provider: self.provider,
                stage: stage.into(),
                source,
            })
    }
}

impl std::fmt::Debug for RoleBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleBinding")
            .field("provider", &self.provider)
            .field("model", &self.model.model_name())
            .finish()
    }
}

/// Models available on this server, keyed by provider.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<Provider, Arc<dyn ChatModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every provider that has credentials.
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut registry = Self::new();

        for provider in Provider::ALL {
            let settings = config.provider(provider);
            let remote = match remote_config(provider, &settings) {
                Ok(remote) => remote,
                Err(e) => {
                    tracing::info!("{} not configured: {}", provider, e);
                    continue;
                }
            };

            match build_client(provider, remote) {
                Ok(model) => {
                    tracing::info!("Registered {} ({})", provider, model.model_name());
                    registry.register(provider, model);
                }
                Err(e) => tracing::warn!("Failed to create {} client: {}", provider, e),
            }
        }

        registry
    }

    pub fn register(&mut self, provider: Provider, model: Arc<dyn ChatModel>) {
        self.models.insert(provider, model);
    }

    pub fn with_model(mut self, provider: Provider, model: Arc<dyn ChatModel>) -> Self {
        self.register(provider, model);
        self
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.models.contains_key(&provider)
    }

    /// Registered providers in display order.
    pub fn configured(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.is_configured(*p))
            .collect()
    }

    /// Bind `provider` to its model, failing if it is not registered.
    pub fn resolve(&self, provider: Provider) -> Result<RoleBinding> {
        let model = self
            .models
            .get(&provider)
            .cloned()
            .ok_or(EngineError::ProviderUnavailable(provider))?;
        Ok(RoleBinding { provider, model })
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("configured", &self.configured())
            .finish()
    }
}

/// Client settings for `provider`: file overrides, then environment, then defaults.
fn remote_config(provider: Provider, settings: &ProviderConfig) -> llm::Result<RemoteLlmConfig> {
    let key_env = settings
        .api_key_env
        .as_deref()
        .unwrap_or_else(|| provider.api_key_env());

    let base_url = settings
        .base_url
        .clone()
        .or_else(|| match provider {
            Provider::Grok => std::env::var(GROK_API_URL_ENV).ok(),
            _ => None,
        })
        .unwrap_or_else(|| provider.default_base_url().to_string());

    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| provider.default_model().to_string());

    let mut config = RemoteLlmConfig::from_env(key_env, base_url, model)?;
    if let Some(secs) = settings.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(max_tokens) = settings.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm::{ChatRequest, ChatResponse, LlmError};

    struct FixedModel(&'static str);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn chat(&self, _request: ChatRequest) -> llm::Result<ChatResponse> {
            if self.0.is_empty() {
                return Err(LlmError::ProviderError("down".to_string()));
            }
            Ok(ChatResponse::new(self.0, "fixed"))
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_resolve_unregistered_provider() {
        let registry = ModelRegistry::new().with_model(Provider::Claude, Arc::new(FixedModel("ok")));

        assert!(registry.resolve(Provider::Claude).is_ok());
        let err = registry.resolve(Provider::Grok).unwrap_err();
        assert!(matches!(err, EngineError::ProviderUnavailable(Provider::Grok)));
        assert_eq!(registry.configured(), vec![Provider::Claude]);
    }

    #[tokio::test]
    async fn test_call_tags_failures_with_stage() {
        let registry = ModelRegistry::new().with_model(Provider::Gemini, Arc::new(FixedModel("")));
        let binding = registry.resolve(Provider::Gemini).unwrap();

        let err = binding.call("Summarize", "judge").await.unwrap_err();
        match err {
            EngineError::StageFailed { provider, stage, .. } => {
                assert_eq!(provider, Provider::Gemini);
                assert_eq!(stage, "judge");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_from_config_only_registers_providers_with_keys() {
        std::env::set_var("AIDEBATE_TEST_REGISTRY_CLAUDE_KEY", "sk-ant-test");

        let mut config = ServerConfig::default();
        for provider in Provider::ALL {
            let key_env = if provider == Provider::Claude {
                "AIDEBATE_TEST_REGISTRY_CLAUDE_KEY".to_string()
            } else {
                format!("AIDEBATE_TEST_REGISTRY_MISSING_{}", provider.config_key())
            };
            config.providers.insert(
                provider.config_key().to_string(),
                ProviderConfig {
                    api_key_env: Some(key_env),
                    ..ProviderConfig::default()
                },
            );
        }

        let registry = ModelRegistry::from_config(&config);
        assert_eq!(registry.configured(), vec![Provider::Claude]);
        assert_eq!(
            registry.resolve(Provider::Claude).unwrap().model.model_name(),
            "claude-3-opus-20240229"
        );

        std::env::remove_var("AIDEBATE_TEST_REGISTRY_CLAUDE_KEY");
    }

    #[test]
    fn test_remote_config_applies_overrides() {
        std::env::set_var("AIDEBATE_TEST_REMOTE_GROK_KEY", "xai-test");
        let settings = ProviderConfig {
            model: Some("grok-2".to_string()),
            base_url: Some("https://grok.example/v1".to_string()),
            api_key_env: Some("AIDEBATE_TEST_REMOTE_GROK_KEY".to_string()),
            timeout_secs: Some(15),
            max_tokens: Some(512),
        };

        let config = remote_config(Provider::Grok, &settings).unwrap();
        assert_eq!(config.model, "grok-2");
        assert_eq!(config.base_url, "https://grok.example/v1");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_tokens, Some(512));

        std::env::remove_var("AIDEBATE_TEST_REMOTE_GROK_KEY");
    }
}
