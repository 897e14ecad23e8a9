//! Server configuration for aidebate-server
//!
//! Loads and parses aidebate.toml with server, progress, limit and provider
//! settings. Every section is optional; a missing file yields the defaults.

use llm::Provider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and bind address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfoConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_server_name() -> String {
    "aidebate-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Timing of progress publication and stage reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// How often a subscription re-reads the job record
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Idle time before a subscription yields a keep-alive
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Pause after each stage update so observers can see it
    #[serde(default = "default_stage_pause_ms")]
    pub stage_pause_ms: u64,
}

impl ProgressConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn stage_pause(&self) -> Duration {
        Duration::from_millis(self.stage_pause_ms)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            keepalive_secs: default_keepalive_secs(),
            stage_pause_ms: default_stage_pause_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_keepalive_secs() -> u64 {
    5
}

fn default_stage_pause_ms() -> u64 {
    500
}

/// Upper bounds on request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_max_ideas")]
    pub max_ideas: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_ideas: default_max_ideas(),
        }
    }
}

fn default_max_rounds() -> u32 {
    5
}

fn default_max_ideas() -> u32 {
    10
}

/// Per-provider overrides. Anything unset falls back to the provider default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<usize>,
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerInfoConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Keyed by lowercase provider identifier (`chatgpt`, `claude`, ...)
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ServerConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/aidebate.toml
    /// 3. ./aidebate.toml
    ///
    /// Falls back to defaults when no file exists. `HOST` and `PORT` override
    /// the bind address either way.
    pub fn load() -> Result<Self, ServerConfigError> {
        let mut config = match Self::locate() {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                tracing::warn!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn locate() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Some(PathBuf::from(config_path));
        }

        [
            PathBuf::from("config/aidebate.toml"),
            PathBuf::from("./aidebate.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ServerConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ServerConfigError::InvalidConfig(format!("PORT must be a valid u16, got '{}'", port)))?;
        }
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.progress.poll_interval_ms == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "progress.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.progress.keepalive_secs == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "progress.keepalive_secs must be greater than zero".to_string(),
            ));
        }
        if self.limits.max_rounds == 0 || self.limits.max_ideas == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "limits must be greater than zero".to_string(),
            ));
        }
        for key in self.providers.keys() {
            key.parse::<Provider>().map_err(|_| {
                ServerConfigError::InvalidConfig(format!("unknown provider table [providers.{}]", key))
            })?;
        }
        Ok(())
    }

    /// Overrides for `provider`, empty when the file has none.
    pub fn provider(&self, provider: Provider) -> ProviderConfig {
        self.providers
            .iter()
            .find(|(key, _)| key.parse::<Provider>().ok() == Some(provider))
            .map(|(_, settings)| settings.clone())
            .unwrap_or_default()
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
