//! API request handlers, organized by resource.

pub mod health;
pub mod jobs;
pub mod launch;
pub mod models;

pub use health::health;
pub use jobs::{get_job, job_events};
pub use launch::{create_debate, create_ideas};
pub use models::list_models;
