//! Multi-LLM debate and business idea orchestration
//!
//! A request creates a [`JobRecord`](job::JobRecord) and schedules a workflow
//! runner on the tokio runtime. The runner calls one LLM per stage and
//! reports each stage through a [`StepTracker`](job::StepTracker), which
//! keeps the record's status token and progress percentage in lockstep with
//! a precomputed step sequence. Clients observe the record either by polling
//! a snapshot or by subscribing to a deduplicated progress stream with
//! keep-alives.
//!
//! # Example
//!
//! ```rust,ignore
//! use aidebate::context::AppContext;
//! use aidebate::workflow::DebateRequest;
//!
//! let context = AppContext::from_config(config);
//! let job_id = context.start_debate(DebateRequest::new("Should cities ban cars?"))?;
//! let record = context.publisher().snapshot(job_id)?;
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod job;
pub mod progress;
pub mod providers;
pub mod version;
pub mod workflow;

use llm::{LlmError, Provider};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the job engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Request rejected before any job record exists
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Provider is supported but has no credentials on this server
    #[error("Provider {0} is not configured on this server")]
    ProviderUnavailable(Provider),

    /// No record for the given job id
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    /// A record with this id already exists
    #[error("Job already exists: {0}")]
    DuplicateJob(Uuid),

    /// A structural LLM call failed and the job cannot continue
    #[error("Error getting response from {provider} ({stage}): {source}")]
    StageFailed {
        provider: Provider,
        stage: String,
        source: LlmError,
    },
}

impl EngineError {
    /// Whether the error means the request itself was unacceptable.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_) | EngineError::ProviderUnavailable(_)
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
