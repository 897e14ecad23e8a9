//! Debate workflow
//!
//! Two models argue opposite sides of a topic for a number of rounds, each
//! rebutting the other's latest argument, and a third model summarizes.
//! Any failed call ends the job with an error.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

use super::reporter::StageReporter;
use crate::job::sequencer::{JUDGING, STARTING};
use crate::job::{DebateResult, DebateRound, JobResult};
use crate::providers::RoleBinding;
use crate::Result;

/// Debate launch request. Unset fields take the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRequest {
    pub topic: String,
    #[serde(default)]
    pub pro_llm: Option<String>,
    #[serde(default)]
    pub con_llm: Option<String>,
    #[serde(default)]
    pub judge_llm: Option<String>,
    #[serde(default)]
    pub rounds: Option<u32>,
}

impl DebateRequest {
    pub const DEFAULT_PRO: &'static str = "ChatGPT";
    pub const DEFAULT_CON: &'static str = "Claude";
    pub const DEFAULT_JUDGE: &'static str = "Gemini";
    pub const DEFAULT_ROUNDS: u32 = 2;

    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_models(
        mut self,
        pro: impl Into<String>,
        con: impl Into<String>,
        judge: impl Into<String>,
    ) -> Self {
        self.pro_llm = Some(pro.into());
        self.con_llm = Some(con.into());
        self.judge_llm = Some(judge.into());
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }
}

/// A debate with every role bound to a model.
#[derive(Debug, Clone)]
pub struct DebateConfig {
    pub topic: String,
    pub pro: RoleBinding,
    pub con: RoleBinding,
    pub judge: RoleBinding,
    pub rounds: u32,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Pro,
    Con,
}

fn opening_prompt(side: Side, topic: &str) -> String {
    match side {
        Side::Pro => format!("Argue in favor of: {}", topic),
        Side::Con => format!("Argue against: {}", topic),
    }
}

fn rebuttal_prompt(side: Side, opponent_argument: &str, topic: &str) -> String {
    let stance = match side {
        Side::Pro => "supporting",
        Side::Con => "opposing",
    };
    format!(
        "Your opponent argued: {}\n\nCounter their argument while {}: {}.",
        opponent_argument, stance, topic
    )
}

fn judge_prompt(topic: &str, rounds: &[DebateRound]) -> String {
    let mut prompt = format!(
        "Summarize the key points of the debate on '{}', highlighting the strongest \
         arguments for and against. Provide a balanced conclusion.\n\nDebate transcript:",
        topic
    );
    for round in rounds {
        prompt.push_str(&format!(
            "\n\nRound {}\nPro: {}\nCon: {}",
            round.round_number, round.pro_argument, round.con_argument
        ));
    }
    prompt
}

/// Run a debate to completion, recording the outcome in the job record.
pub async fn run_debate(config: DebateConfig, mut reporter: StageReporter) {
    let job_id = reporter.job_id();
    let started = Instant::now();
    info!(
        job_id = %job_id,
        pro = %config.pro.provider,
        con = %config.con.provider,
        judge = %config.judge.provider,
        rounds = config.rounds,
        "Starting debate on '{}'",
        config.topic
    );

    match execute(&config, &mut reporter).await {
        Ok(result) => {
            info!(job_id = %job_id, elapsed = ?started.elapsed(), "Debate completed");
            if let Err(e) = reporter.complete("Debate completed successfully!", JobResult::Debate(result)) {
                error!(job_id = %job_id, "Failed to record debate result: {}", e);
            }
        }
        Err(e) => {
            error!(job_id = %job_id, elapsed = ?started.elapsed(), "Debate failed: {}", e);
            if let Err(write_err) = reporter.fail(&e) {
                error!(job_id = %job_id, "Failed to record debate error: {}", write_err);
            }
        }
    }
}

async fn execute(config: &DebateConfig, reporter: &mut StageReporter) -> Result<DebateResult> {
    let topic = config.topic.as_str();
    let pro = &config.pro;
    let con = &config.con;

    reporter
        .advance(
            STARTING,
            format!(
                "Starting debate: {} (for) vs {} (against), judged by {}",
                pro.provider, con.provider, config.judge.provider
            ),
        )
        .await?;

    reporter
        .advance("pro_initial", format!("Getting initial argument from {}...", pro.provider))
        .await?;
    let mut pro_argument = pro
        .call(&opening_prompt(Side::Pro, topic), "pro side, opening")
        .await?;
    info!("Received initial pro argument ({} chars)", pro_argument.len());

    reporter
        .advance("con_initial", format!("Getting initial argument from {}...", con.provider))
        .await?;
    let mut con_argument = con
        .call(&opening_prompt(Side::Con, topic), "con side, opening")
        .await?;
    info!("Received initial con argument ({} chars)", con_argument.len());

    let mut rounds = Vec::with_capacity(config.rounds as usize);
    for round_number in 1..=config.rounds {
        rounds.push(DebateRound {
            round_number,
            pro_argument: pro_argument.clone(),
            con_argument: con_argument.clone(),
        });

        if round_number == config.rounds {
            break;
        }
        let next = round_number + 1;

        reporter
            .advance(
                &format!("pro_round_{}", next),
                format!("Round {}: Getting response from {}...", next, pro.provider),
            )
            .await?;
        pro_argument = pro
            .call(
                &rebuttal_prompt(Side::Pro, &con_argument, topic),
                format!("pro side, round {}", next),
            )
            .await?;

        // Con answers the rebuttal it just received
        reporter
            .advance(
                &format!("con_round_{}", next),
                format!("Round {}: Getting response from {}...", next, con.provider),
            )
            .await?;
        con_argument = con
            .call(
                &rebuttal_prompt(Side::Con, &pro_argument, topic),
                format!("con side, round {}", next),
            )
            .await?;
        info!("Round {} arguments received", next);
    }

    reporter
        .advance(
            JUDGING,
            format!("Getting final summary from {}...", config.judge.provider),
        )
        .await?;
    let summary = config
        .judge
        .call(&judge_prompt(topic, &rounds), "judge summary")
        .await?;
    info!("Received judge summary ({} chars)", summary.len());

    Ok(DebateResult { rounds, summary })
}
