//! Shared fixtures for integration tests
//!
//! Scripted chat models stand in for the remote providers, and a recording
//! store keeps every version of every record written.

#![allow(dead_code)]

use aidebate::config::ServerConfig;
use aidebate::job::{InMemoryJobStore, JobParams, JobRecord, JobStore, StepSequence};
use aidebate::providers::{ModelRegistry, RoleBinding};
use aidebate::workflow::StageReporter;
use async_trait::async_trait;
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError, Provider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Chat model that answers from a queue of canned replies.
pub struct ScriptedModel {
    name: String,
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            fallback: None,
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a provider failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// Reply used once the queue is empty.
    pub fn otherwise(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        self.prompts.lock().unwrap().push(request.prompt);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(ChatResponse::new(text, self.name.clone())),
            Some(Err(message)) => Err(LlmError::ProviderError(message)),
            None => match &self.fallback {
                Some(text) => Ok(ChatResponse::new(text.clone(), self.name.clone())),
                None => Err(LlmError::ProviderError(format!("{} has no more replies", self.name))),
            },
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// In-memory store that also keeps every record it was handed.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryJobStore,
    history: Mutex<Vec<JobRecord>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current version of a record that must exist.
    pub fn get_record(&self, id: Uuid) -> JobRecord {
        self.inner.get(id).expect("job record exists")
    }

    /// Every version of one record, oldest first.
    pub fn history(&self, id: Uuid) -> Vec<JobRecord> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.id == id)
            .cloned()
            .collect()
    }

    /// Distinct consecutive status tokens of one record.
    pub fn statuses(&self, id: Uuid) -> Vec<String> {
        let mut statuses: Vec<String> = Vec::new();
        for record in self.history(id) {
            if statuses.last() != Some(&record.status) {
                statuses.push(record.status);
            }
        }
        statuses
    }
}

impl JobStore for RecordingStore {
    fn insert(&self, record: JobRecord) -> aidebate::Result<()> {
        self.inner.insert(record.clone())?;
        self.history.lock().unwrap().push(record);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.inner.get(id)
    }

    fn put(&self, record: JobRecord) -> aidebate::Result<()> {
        self.inner.put(record.clone())?;
        self.history.lock().unwrap().push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Defaults with no stage pause and fast polling.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.progress.stage_pause_ms = 0;
    config.progress.poll_interval_ms = 5;
    config.progress.keepalive_secs = 1;
    config
}

pub fn binding(provider: Provider, model: &Arc<ScriptedModel>) -> RoleBinding {
    RoleBinding {
        provider,
        model: model.clone(),
    }
}

/// Registry where ChatGPT, Claude and Gemini answer `reply` forever.
pub fn echo_registry(reply: &str) -> ModelRegistry {
    [Provider::ChatGpt, Provider::Claude, Provider::Gemini]
        .into_iter()
        .fold(ModelRegistry::new(), |registry, provider| {
            let model = ScriptedModel::new(format!("scripted-{}", provider.config_key())).otherwise(reply);
            registry.with_model(provider, Arc::new(model))
        })
}

/// Insert a fresh record and hand back a reporter for it.
pub fn start_job(store: &Arc<RecordingStore>, params: JobParams, sequence: StepSequence) -> StageReporter {
    let record = JobRecord::new(params);
    let id = record.id;
    store.insert(record).unwrap();
    StageReporter::new(store.clone(), id, sequence, Duration::ZERO)
}

/// Poll until the job is terminal.
pub async fn wait_for_completion(store: &dyn JobStore, id: Uuid) -> JobRecord {
    let poll = async {
        loop {
            let record = store.get(id).expect("job record exists");
            if record.completed {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(10), poll)
        .await
        .expect("job finished in time")
}

/// Progress must never go back and must reach 100 only on the terminal record.
pub fn assert_progress_well_formed(history: &[JobRecord]) {
    for pair in history.windows(2) {
        assert!(
            pair[1].progress >= pair[0].progress,
            "progress went from {} to {}",
            pair[0].progress,
            pair[1].progress
        );
    }
    for record in history {
        assert_eq!(record.progress == 100, record.completed, "record: {:?}", record.status);
    }
}
