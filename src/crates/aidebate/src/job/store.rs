//! Job record storage
//!
//! [`JobStore`] is the only shared mutable state in the engine. Every write is
//! a whole-record replacement, so readers never observe a half-applied update.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::record::JobRecord;
use crate::{EngineError, Result};

/// Keyed storage of job records.
pub trait JobStore: Send + Sync {
    /// Add a new record. Fails if the id is already taken.
    fn insert(&self, record: JobRecord) -> Result<()>;

    /// Snapshot of a record.
    fn get(&self, id: Uuid) -> Option<JobRecord>;

    /// Replace an existing record.
    fn put(&self, record: JobRecord) -> Result<()>;

    /// Number of records held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store on a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    records: DashMap<Uuid, JobRecord>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, record: JobRecord) -> Result<()> {
        match self.records.entry(record.id) {
            Entry::Occupied(entry) => Err(EngineError::DuplicateJob(*entry.key())),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.records.get(&id).map(|record| record.value().clone())
    }

    fn put(&self, record: JobRecord) -> Result<()> {
        match self.records.get_mut(&record.id) {
            Some(mut slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(EngineError::JobNotFound(record.id)),
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
