//! Job progress publication
//!
//! Pull access returns the current snapshot of a record. Push access is a
//! finite stream that polls the store, emits each distinct snapshot once,
//! fills idle windows with keep-alives and ends after the terminal record.

use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ProgressConfig;
use crate::job::{JobRecord, JobStore};
use crate::{EngineError, Result};

/// One item of a progress subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The record changed since the last snapshot sent
    Snapshot(JobRecord),
    /// Nothing changed for a whole keep-alive window
    KeepAlive,
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Snapshot(record) if record.completed)
    }
}

/// Read side of the job store.
#[derive(Clone)]
pub struct ProgressPublisher {
    store: Arc<dyn JobStore>,
    poll_interval: Duration,
    keepalive: Duration,
}

impl ProgressPublisher {
    pub fn new(store: Arc<dyn JobStore>, poll_interval: Duration, keepalive: Duration) -> Self {
        Self {
            store,
            poll_interval,
            keepalive,
        }
    }

    pub fn from_config(store: Arc<dyn JobStore>, config: &ProgressConfig) -> Self {
        Self::new(store, config.poll_interval(), config.keepalive())
    }

    /// Current state of a job.
    pub fn snapshot(&self, job_id: Uuid) -> Result<JobRecord> {
        self.store
            .get(job_id)
            .ok_or(EngineError::JobNotFound(job_id))
    }

    /// Follow a job until it completes.
    ///
    /// Unknown ids are rejected here rather than producing an empty stream.
    /// Dropping the stream has no effect on the job.
    pub fn subscribe(
        &self,
        job_id: Uuid,
    ) -> Result<impl Stream<Item = ProgressEvent> + Send + 'static> {
        let first = self.snapshot(job_id)?;
        let store = self.store.clone();
        let poll_interval = self.poll_interval;
        let keepalive = self.keepalive;

        debug!(job_id = %job_id, "Progress subscription opened");

        Ok(async_stream::stream! {
            let mut pending = Some(first);
            let mut last_sent: Option<JobRecord> = None;
            let mut last_activity = Instant::now();

            loop {
                let record = match pending.take().or_else(|| store.get(job_id)) {
                    Some(record) => record,
                    None => {
                        warn!(job_id = %job_id, "Job record disappeared during subscription");
                        break;
                    }
                };

                if last_sent.as_ref() != Some(&record) {
                    let terminal = record.completed;
                    last_sent = Some(record.clone());
                    last_activity = Instant::now();
                    yield ProgressEvent::Snapshot(record);
                    if terminal {
                        break;
                    }
                } else if last_activity.elapsed() >= keepalive {
                    last_activity = Instant::now();
                    yield ProgressEvent::KeepAlive;
                }

                tokio::time::sleep(poll_interval).await;
            }

            debug!(job_id = %job_id, "Progress subscription closed");
        })
    }
}
