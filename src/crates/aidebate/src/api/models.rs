//! API data transfer objects
//!
//! Launch requests reuse [`DebateRequest`](crate::workflow::DebateRequest) and
//! [`IdeaRequest`](crate::workflow::IdeaRequest) directly; job snapshots are
//! the [`JobRecord`](crate::job::JobRecord) itself.

use llm::Provider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// System health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Server name from configuration
    pub server: String,
    /// API version
    pub version: String,
    /// Jobs created since startup
    pub jobs: usize,
    /// Providers with credentials
    pub providers_configured: usize,
    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>, server: impl Into<String>, jobs: usize, providers_configured: usize) -> Self {
        Self {
            status: status.into(),
            server: server.into(),
            version: crate::version::VERSION.to_string(),
            jobs,
            providers_configured,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// One selectable provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Identifier accepted in launch requests
    pub id: Provider,
    pub configured: bool,
    /// Model the provider is bound to, when configured
    pub model: Option<String>,
}

/// Reply to a launch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAccepted {
    pub job_id: Uuid,
    pub status_url: String,
    pub events_url: String,
}

impl JobAccepted {
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            status_url: format!("/api/v1/jobs/{}", job_id),
            events_url: format!("/api/v1/jobs/{}/events", job_id),
        }
    }
}
