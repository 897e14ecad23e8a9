//! Job records and their lifecycle
//!
//! - [`record`]: the keyed, snapshot-able state of one workflow run
//! - [`result`]: payloads attached on successful completion
//! - [`store`]: the process-wide id to record mapping
//! - [`sequencer`]: step sequences and the self-healing step tracker

pub mod record;
pub mod result;
pub mod sequencer;
pub mod store;

pub use record::{DebateParams, IdeaParams, JobKind, JobParams, JobRecord};
pub use result::{
    Critique, CritiqueOutcome, DebateResult, DebateRound, Idea, IdeasResult, JobResult,
    ScoredAspect,
};
pub use sequencer::{StepSequence, StepTracker, StepUpdate};
pub use store::{InMemoryJobStore, JobStore};
