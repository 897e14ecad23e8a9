//! Business idea pipeline integration tests

mod common;

use aidebate::job::{IdeaParams, IdeasResult, JobParams, JobResult, JobRecord, StepSequence};
use aidebate::workflow::business::{CRITIQUE_PARSE_FAILED, REFINEMENT_SKIPPED};
use aidebate::workflow::{run_business_ideas, IdeaConfig};
use common::{assert_progress_well_formed, binding, start_job, RecordingStore, ScriptedModel};
use llm::Provider;
use std::sync::Arc;

const THREE_IDEAS: &str = r#"Sure! Here are three ideas:
[
  {"title": "Bean Box", "description": "Coffee subscription", "target_market": "Commuters", "monetization": "Monthly plan"},
  {"title": "Brew Bot", "description": "Office espresso robot", "target_market": "Offices", "monetization": "Leasing"},
  {"title": "Cup Swap", "description": "Reusable cup network", "target_market": "Cafes", "monetization": "Deposit fees"}
]
Let me know if you want more."#;

fn critique(overall: f64) -> String {
    format!(
        r#"{{
  "feasibility": {{"score": 7, "explanation": "Doable"}},
  "market_potential": {{"score": 8, "explanation": "Large"}},
  "technical_complexity": {{"score": 6, "explanation": "Moderate"}},
  "monetization_viability": {{"score": 7, "explanation": "Clear"}},
  "competitive_landscape": ["Incumbent A"],
  "overall_score": {overall},
  "key_strengths": ["Recurring revenue", "Simple logistics"],
  "key_weaknesses": ["Churn", "Thin margins"],
  "improvement_suggestions": ["Bundle merch", "Corporate tier"]
}}"#
    )
}

struct Team {
    generator: Arc<ScriptedModel>,
    critic: Arc<ScriptedModel>,
    refiner: Arc<ScriptedModel>,
    judge: Arc<ScriptedModel>,
}

impl Team {
    fn config(&self, num_ideas: u32) -> IdeaConfig {
        IdeaConfig {
            topic: "Coffee".to_string(),
            generator: binding(Provider::ChatGpt, &self.generator),
            critic: binding(Provider::Claude, &self.critic),
            refiner: binding(Provider::Gemini, &self.refiner),
            judge: binding(Provider::ChatGpt, &self.judge),
            num_ideas,
        }
    }

    async fn run(&self, num_ideas: u32) -> (Arc<RecordingStore>, JobRecord) {
        let store = RecordingStore::new();
        let params = JobParams::BusinessIdeas(IdeaParams {
            topic: "Coffee".to_string(),
            generator: Provider::ChatGpt,
            critic: Provider::Claude,
            refiner: Provider::Gemini,
            judge: Provider::ChatGpt,
            num_ideas,
        });
        let reporter = start_job(&store, params, StepSequence::business());
        let job_id = reporter.job_id();

        run_business_ideas(self.config(num_ideas), reporter).await;

        let record = store.get_record(job_id);
        (store, record)
    }
}

fn ideas_of(record: JobRecord) -> IdeasResult {
    match record.result {
        Some(JobResult::BusinessIdeas(result)) => result,
        _ => panic!("expected a business idea result"),
    }
}

#[tokio::test]
async fn test_unparseable_critique_skips_refinement() {
    let team = Team {
        generator: ScriptedModel::new("generator").reply(THREE_IDEAS).into_arc(),
        critic: ScriptedModel::new("critic")
            .reply(critique(6.0))
            .reply("I would rather not score this one.")
            .reply(critique(8.0))
            .into_arc(),
        refiner: ScriptedModel::new("refiner")
            .reply("Bean Box Pro: adds a corporate tier.")
            .reply("Cup Swap+: partners with campuses.")
            .into_arc(),
        judge: ScriptedModel::new("judge")
            .reply(
                r#"[
  {"id": 2, "final_score": 9.0, "explanation": "Strong network effects"},
  {"id": 0, "final_score": 7.5, "explanation": "Proven model"},
  {"id": 1, "final_score": 3.0, "explanation": "Unclear demand"}
]"#,
            )
            .into_arc(),
    };

    let (store, record) = team.run(3).await;
    assert!(record.completed);
    assert!(record.error.is_none());
    assert_eq!(
        store.statuses(record.id),
        vec!["starting", "step1", "step2", "step3", "step4", "completed"]
    );
    assert_progress_well_formed(&store.history(record.id));

    let result = ideas_of(record);
    assert_eq!(result.topic, "Coffee");
    assert_eq!(result.ideas.len(), 3);

    let order: Vec<usize> = result.ideas.iter().map(|idea| idea.id).collect();
    assert_eq!(order, vec![2, 0, 1]);
    assert_eq!(result.ideas[0].score, 9.0);
    assert_eq!(
        result.ideas[0].ranking_explanation.as_deref(),
        Some("Strong network effects")
    );

    let brew_bot = &result.ideas[2];
    assert_eq!(brew_bot.title, "Brew Bot");
    let outcome = brew_bot.critique.as_ref().expect("critique recorded");
    assert!(brew_bot.usable_critique().is_none());
    assert_eq!(outcome.error(), Some(CRITIQUE_PARSE_FAILED));
    assert_eq!(brew_bot.refinement.as_deref(), Some(REFINEMENT_SKIPPED));

    let bean_box = &result.ideas[1];
    assert_eq!(
        bean_box.refinement.as_deref(),
        Some("Bean Box Pro: adds a corporate tier.")
    );
    assert_eq!(team.refiner.call_count(), 2);
    assert_eq!(team.critic.call_count(), 3);
}

#[tokio::test]
async fn test_unparseable_ranking_keeps_order() {
    let team = Team {
        generator: ScriptedModel::new("generator").reply(THREE_IDEAS).into_arc(),
        critic: ScriptedModel::new("critic")
            .reply(critique(4.0))
            .reply(critique(9.0))
            .reply(critique(6.5))
            .into_arc(),
        refiner: ScriptedModel::new("refiner").otherwise("Refined.").into_arc(),
        judge: ScriptedModel::new("judge")
            .reply("They are all wonderful in their own way.")
            .into_arc(),
    };

    let (_, record) = team.run(3).await;
    assert!(record.error.is_none());

    let result = ideas_of(record);
    let order: Vec<usize> = result.ideas.iter().map(|idea| idea.id).collect();
    assert_eq!(order, vec![0, 1, 2]);
    let scores: Vec<f64> = result.ideas.iter().map(|idea| idea.score).collect();
    assert_eq!(scores, vec![4.0, 9.0, 6.5]);
    assert!(result.ideas.iter().all(|idea| idea.ranking_explanation.is_none()));
}

#[tokio::test]
async fn test_generator_failure_is_fatal() {
    let team = Team {
        generator: ScriptedModel::new("generator").fail("service unavailable").into_arc(),
        critic: ScriptedModel::new("critic").otherwise(critique(5.0)).into_arc(),
        refiner: ScriptedModel::new("refiner").otherwise("Refined.").into_arc(),
        judge: ScriptedModel::new("judge").otherwise("[]").into_arc(),
    };

    let (_, record) = team.run(3).await;
    assert!(record.completed);
    assert!(record.result.is_none());
    assert_eq!(record.status, "error");

    let error = record.error.expect("error recorded");
    assert!(error.contains("ChatGPT"));
    assert!(error.contains("idea generation"));
    assert_eq!(team.critic.call_count(), 0);
}

#[tokio::test]
async fn test_soft_failures_do_not_fail_job() {
    let team = Team {
        generator: ScriptedModel::new("generator").reply("No JSON today, sorry.").into_arc(),
        critic: ScriptedModel::new("critic")
            .fail("overloaded")
            .reply(critique(5.0))
            .into_arc(),
        refiner: ScriptedModel::new("refiner").fail("timeout").into_arc(),
        judge: ScriptedModel::new("judge").fail("down").into_arc(),
    };

    let (_, record) = team.run(2).await;
    assert!(record.completed);
    assert!(record.error.is_none());

    let result = ideas_of(record);
    assert_eq!(result.ideas.len(), 2);
    assert_eq!(result.ideas[0].title, "Business Idea 1");
    assert_eq!(result.ideas[1].title, "Business Idea 2");

    let first = &result.ideas[0];
    let error = first.critique.as_ref().and_then(|c| c.error()).unwrap();
    assert!(error.starts_with("Error during critique"));
    assert_eq!(first.refinement.as_deref(), Some(REFINEMENT_SKIPPED));

    let second = &result.ideas[1];
    assert!(second.usable_critique().is_some());
    assert!(second
        .refinement
        .as_deref()
        .unwrap()
        .starts_with("Error during refinement"));
}

#[tokio::test]
async fn test_generator_output_is_truncated() {
    let team = Team {
        generator: ScriptedModel::new("generator").reply(THREE_IDEAS).into_arc(),
        critic: ScriptedModel::new("critic").otherwise(critique(5.0)).into_arc(),
        refiner: ScriptedModel::new("refiner").otherwise("Refined.").into_arc(),
        judge: ScriptedModel::new("judge").otherwise("[]").into_arc(),
    };

    let (_, record) = team.run(2).await;
    let result = ideas_of(record);
    assert_eq!(result.ideas.len(), 2);
    assert_eq!(team.critic.call_count(), 2);
    assert!(team.generator.prompts()[0].contains("Generate 2 innovative business ideas"));
}
