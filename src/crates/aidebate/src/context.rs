//! Process-wide application context
//!
//! Owns the job store, the provider registry and the progress publisher, and
//! is the trigger boundary for new jobs: requests are validated, a record is
//! created, and the runner is spawned on the tokio runtime. The caller gets
//! the job id back immediately.

use llm::Provider;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::job::{
    DebateParams, IdeaParams, InMemoryJobStore, JobParams, JobRecord, JobStore, StepSequence,
};
use crate::progress::ProgressPublisher;
use crate::providers::ModelRegistry;
use crate::workflow::{
    run_business_ideas, run_debate, DebateConfig, DebateRequest, IdeaConfig, IdeaRequest,
    StageReporter,
};
use crate::{EngineError, Result};

pub struct AppContext {
    config: ServerConfig,
    store: Arc<dyn JobStore>,
    registry: ModelRegistry,
    publisher: ProgressPublisher,
}

impl AppContext {
    /// Context with an in-memory store.
    pub fn new(config: ServerConfig, registry: ModelRegistry) -> Self {
        Self::with_store(config, registry, Arc::new(InMemoryJobStore::new()))
    }

    pub fn with_store(config: ServerConfig, registry: ModelRegistry, store: Arc<dyn JobStore>) -> Self {
        let publisher = ProgressPublisher::from_config(store.clone(), &config.progress);
        Self {
            config,
            store,
            registry,
            publisher,
        }
    }

    /// Context with every provider that has credentials registered.
    pub fn from_config(config: ServerConfig) -> Self {
        let registry = ModelRegistry::from_config(&config);
        Self::new(config, registry)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn publisher(&self) -> &ProgressPublisher {
        &self.publisher
    }

    /// Validate, record and launch a debate. Must be called inside a tokio runtime.
    pub fn start_debate(&self, request: DebateRequest) -> Result<Uuid> {
        let topic = validate_topic(&request.topic)?;
        let rounds = request.rounds.unwrap_or(DebateRequest::DEFAULT_ROUNDS);
        if !(1..=self.config.limits.max_rounds).contains(&rounds) {
            return Err(EngineError::InvalidConfig(format!(
                "Rounds must be between 1 and {}",
                self.config.limits.max_rounds
            )));
        }

        let params = DebateParams {
            topic: topic.clone(),
            pro: parse_provider(request.pro_llm.as_deref(), DebateRequest::DEFAULT_PRO)?,
            con: parse_provider(request.con_llm.as_deref(), DebateRequest::DEFAULT_CON)?,
            judge: parse_provider(request.judge_llm.as_deref(), DebateRequest::DEFAULT_JUDGE)?,
            rounds,
        };
        let config = DebateConfig {
            topic,
            pro: self.registry.resolve(params.pro)?,
            con: self.registry.resolve(params.con)?,
            judge: self.registry.resolve(params.judge)?,
            rounds,
        };

        tracing::info!(
            "Debate requested - Topic: '{}', Pro: {}, Con: {}, Judge: {}, Rounds: {}",
            params.topic,
            params.pro,
            params.con,
            params.judge,
            params.rounds
        );

        let reporter = self.create_job(JobParams::Debate(params), StepSequence::debate(rounds))?;
        let job_id = reporter.job_id();
        tokio::spawn(run_debate(config, reporter));
        Ok(job_id)
    }

    /// Validate, record and launch a business idea run. Must be called inside a tokio runtime.
    pub fn start_business_ideas(&self, request: IdeaRequest) -> Result<Uuid> {
        let topic = validate_topic(&request.topic)?;
        let num_ideas = request.num_ideas.unwrap_or(IdeaRequest::DEFAULT_NUM_IDEAS);
        if !(1..=self.config.limits.max_ideas).contains(&num_ideas) {
            return Err(EngineError::InvalidConfig(format!(
                "Number of ideas must be between 1 and {}",
                self.config.limits.max_ideas
            )));
        }

        let params = IdeaParams {
            topic: topic.clone(),
            generator: parse_provider(request.generator_llm.as_deref(), IdeaRequest::DEFAULT_GENERATOR)?,
            critic: parse_provider(request.critic_llm.as_deref(), IdeaRequest::DEFAULT_CRITIC)?,
            refiner: parse_provider(request.refiner_llm.as_deref(), IdeaRequest::DEFAULT_REFINER)?,
            judge: parse_provider(request.judge_llm.as_deref(), IdeaRequest::DEFAULT_JUDGE)?,
            num_ideas,
        };
        let config = IdeaConfig {
            topic,
            generator: self.registry.resolve(params.generator)?,
            critic: self.registry.resolve(params.critic)?,
            refiner: self.registry.resolve(params.refiner)?,
            judge: self.registry.resolve(params.judge)?,
            num_ideas,
        };

        tracing::info!(
            "Business ideas requested - Topic: '{}', Generator: {}, Critic: {}, Refiner: {}, Judge: {}, Ideas: {}",
            params.topic,
            params.generator,
            params.critic,
            params.refiner,
            params.judge,
            params.num_ideas
        );

        let reporter = self.create_job(JobParams::BusinessIdeas(params), StepSequence::business())?;
        let job_id = reporter.job_id();
        tokio::spawn(run_business_ideas(config, reporter));
        Ok(job_id)
    }

    /// Insert the record before anything can observe or run the job.
    fn create_job(&self, params: JobParams, sequence: StepSequence) -> Result<StageReporter> {
        let record = JobRecord::new(params);
        let job_id = record.id;
        self.store.insert(record)?;
        Ok(StageReporter::new(
            self.store.clone(),
            job_id,
            sequence,
            self.config.progress.stage_pause(),
        ))
    }
}

fn validate_topic(topic: &str) -> Result<String> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(EngineError::InvalidConfig("Topic cannot be empty".to_string()));
    }
    Ok(topic.to_string())
}

fn parse_provider(requested: Option<&str>, default: &str) -> Result<Provider> {
    let name = requested.unwrap_or(default);
    name.parse().map_err(|_| {
        let options: Vec<&str> = Provider::ALL.iter().map(|p| p.display_name()).collect();
        EngineError::InvalidConfig(format!(
            "Invalid LLM selection '{}'. Please use one of: {}",
            name,
            options.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("  AI in schools ").unwrap(), "AI in schools");
        assert!(matches!(validate_topic("   "), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_provider_defaults_and_errors() {
        assert_eq!(parse_provider(None, "Claude").unwrap(), Provider::Claude);
        assert_eq!(parse_provider(Some("grok"), "Claude").unwrap(), Provider::Grok);

        let err = parse_provider(Some("bard"), "Claude").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'bard'"));
        assert!(message.contains("ChatGPT, Claude, Gemini, Grok"));
    }

    #[test]
    fn test_rejected_requests_create_no_record() {
        let context = AppContext::new(ServerConfig::default(), ModelRegistry::new());

        assert!(context.start_debate(DebateRequest::new("")).is_err());
        assert!(context
            .start_debate(DebateRequest::new("cats").with_rounds(0))
            .is_err());
        assert!(context
            .start_debate(DebateRequest::new("cats").with_rounds(6))
            .is_err());
        assert!(context
            .start_business_ideas(IdeaRequest::new("cats").with_num_ideas(11))
            .is_err());

        // Valid shape, but no provider is registered
        let err = context.start_debate(DebateRequest::new("cats")).unwrap_err();
        assert!(matches!(err, EngineError::ProviderUnavailable(Provider::ChatGpt)));

        assert!(context.store().is_empty());
    }
}
