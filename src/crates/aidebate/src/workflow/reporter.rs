//! Stage reporting for workflow runners
//!
//! The reporter is the only writer of a job's record. Each update is a
//! read-modify-write of the whole record through the [`JobStore`].

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::job::sequencer::COMPLETED;
use crate::job::{JobRecord, JobResult, JobStore, StepSequence, StepTracker};
use crate::{EngineError, Result};

/// Publishes a runner's progress into its job record.
pub struct StageReporter {
    store: Arc<dyn JobStore>,
    job_id: Uuid,
    tracker: StepTracker,
    pause: Duration,
}

impl StageReporter {
    pub fn new(store: Arc<dyn JobStore>, job_id: Uuid, sequence: StepSequence, pause: Duration) -> Self {
        Self {
            store,
            job_id,
            tracker: StepTracker::new(sequence),
            pause,
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Step the tracker expects next.
    pub fn expected(&self) -> &str {
        self.tracker.expected()
    }

    /// Enter the next step.
    pub async fn advance(&mut self, step: &str, message: impl Into<String>) -> Result<()> {
        let update = self.tracker.advance(step);
        let message = message.into();
        tracing::debug!(job_id = %self.job_id, step = %update.token, progress = update.progress, "{}", message);

        self.write(|record| record.advance(&update.token, message, update.progress))?;
        self.settle().await;
        Ok(())
    }

    /// Change the activity message without moving to another step.
    pub async fn note(&self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        self.write(|record| record.set_message(message))?;
        self.settle().await;
        Ok(())
    }

    /// Finish successfully with `result`.
    pub fn complete(mut self, message: impl Into<String>, result: JobResult) -> Result<()> {
        self.tracker.advance(COMPLETED);
        let message = message.into();
        self.write(|record| record.complete(message, result))
    }

    /// Finish with an error. No result is kept.
    pub fn fail(self, error: &EngineError) -> Result<()> {
        let error = error.to_string();
        self.write(|record| record.fail(error))
    }

    fn write(&self, apply: impl FnOnce(&mut JobRecord)) -> Result<()> {
        let mut record = self
            .store
            .get(self.job_id)
            .ok_or(EngineError::JobNotFound(self.job_id))?;
        apply(&mut record);
        self.store.put(record)
    }

    async fn settle(&self) {
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }
}
