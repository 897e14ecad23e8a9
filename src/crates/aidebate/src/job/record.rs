//! Job record model
//!
//! A record is only ever replaced as a whole. Readers always hold a complete
//! snapshot; the runner that owns a job is the sole writer.

use chrono::{DateTime, Utc};
use llm::Provider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::JobResult;
use super::sequencer::{COMPLETED, STARTING};

/// Status token of a failed job.
pub const ERROR: &str = "error";

/// Which workflow a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Debate,
    BusinessIdeas,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Debate => write!(f, "debate"),
            JobKind::BusinessIdeas => write!(f, "business_ideas"),
        }
    }
}

/// Launch parameters of a debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateParams {
    pub topic: String,
    pub pro: Provider,
    pub con: Provider,
    pub judge: Provider,
    pub rounds: u32,
}

/// Launch parameters of a business idea run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaParams {
    pub topic: String,
    pub generator: Provider,
    pub critic: Provider,
    pub refiner: Provider,
    pub judge: Provider,
    pub num_ideas: u32,
}

/// Immutable launch configuration of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobParams {
    Debate(DebateParams),
    BusinessIdeas(IdeaParams),
}

impl JobParams {
    pub fn kind(&self) -> JobKind {
        match self {
            JobParams::Debate(_) => JobKind::Debate,
            JobParams::BusinessIdeas(_) => JobKind::BusinessIdeas,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            JobParams::Debate(p) => &p.topic,
            JobParams::BusinessIdeas(p) => &p.topic,
        }
    }
}

/// State of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job identifier, never reused
    pub id: Uuid,
    pub kind: JobKind,
    /// Current step token, or `"error"`
    pub status: String,
    /// Human-readable description of the current activity
    pub message: String,
    /// Percentage, 100 only once the job is terminal
    pub progress: u8,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub params: JobParams,
    /// Set only on successful completion
    pub result: Option<JobResult>,
    pub completed: bool,
    /// Set only on failure
    pub error: Option<String>,
}

impl JobRecord {
    /// Create a fresh record in the `starting` state.
    pub fn new(params: JobParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind: params.kind(),
            status: STARTING.to_string(),
            message: format!("Queued {} on '{}'", params.kind(), params.topic()),
            progress: 0,
            started_at: now,
            updated_at: now,
            params,
            result: None,
            completed: false,
            error: None,
        }
    }

    /// Move to a new step. Ignored once terminal; progress never goes back.
    pub fn advance(&mut self, status: &str, message: impl Into<String>, progress: u8) {
        if self.completed {
            return;
        }
        self.status = status.to_string();
        self.message = message.into();
        self.progress = self.progress.max(progress.min(99));
        self.touch();
    }

    /// Replace only the activity message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        if self.completed {
            return;
        }
        self.message = message.into();
        self.touch();
    }

    /// Terminal success.
    pub fn complete(&mut self, message: impl Into<String>, result: JobResult) {
        if self.completed {
            return;
        }
        self.status = COMPLETED.to_string();
        self.message = message.into();
        self.progress = 100;
        self.result = Some(result);
        self.error = None;
        self.completed = true;
        self.touch();
    }

    /// Terminal failure. Any partial result is dropped.
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.completed {
            return;
        }
        let error = error.into();
        self.status = ERROR.to_string();
        self.message = error.clone();
        self.progress = 100;
        self.result = None;
        self.error = Some(error);
        self.completed = true;
        self.touch();
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
