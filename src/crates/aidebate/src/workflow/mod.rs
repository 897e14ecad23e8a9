//! Workflow runners
//!
//! Each runner drives one job from its first step to a terminal state,
//! reporting through a [`StageReporter`]. Runners never return errors; the
//! outcome is written into the job record.

pub mod business;
pub mod debate;
pub mod extract;
pub mod reporter;

pub use business::{run_business_ideas, IdeaConfig, IdeaRequest};
pub use debate::{run_debate, DebateConfig, DebateRequest};
pub use reporter::StageReporter;
