//! Step sequences and progress accounting
//!
//! The full list of step tokens for a job is computed once when the job is
//! created. Runners report the token they believe they are at; the tracker
//! checks it against the next expected token and substitutes the expected
//! one when they disagree, so the published status can never skip or repeat
//! a step.

use tracing::warn;

/// First token of every debate.
pub const STARTING: &str = "starting";
/// Terminal token of every sequence.
pub const COMPLETED: &str = "completed";
/// Judge stage of a debate.
pub const JUDGING: &str = "judging";

/// Highest progress reported before the terminal step.
const MAX_RUNNING_PROGRESS: usize = 95;

/// Ordered, immutable list of step tokens for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequence {
    tokens: Vec<String>,
}

impl StepSequence {
    /// Debate steps for `rounds` rounds (at least one).
    ///
    /// `starting, pro_initial, con_initial, pro_round_2, con_round_2, ...,
    /// judging, completed`
    pub fn debate(rounds: u32) -> Self {
        let rounds = rounds.max(1);
        let mut tokens = vec![
            STARTING.to_string(),
            "pro_initial".to_string(),
            "con_initial".to_string(),
        ];
        for round in 2..=rounds {
            tokens.push(format!("pro_round_{}", round));
            tokens.push(format!("con_round_{}", round));
        }
        tokens.push(JUDGING.to_string());
        tokens.push(COMPLETED.to_string());
        Self { tokens }
    }

    /// Business idea steps: generate, critique, refine, rank.
    pub fn business() -> Self {
        let tokens = ["step1", "step2", "step3", "step4", COMPLETED]
            .into_iter()
            .map(String::from)
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token expected at `cursor`. Past the end this stays on the last token.
    pub fn next_expected(&self, cursor: usize) -> &str {
        let index = cursor.min(self.tokens.len().saturating_sub(1));
        self.tokens.get(index).map(String::as_str).unwrap_or(COMPLETED)
    }

    /// Token to publish when `reported` arrives at `cursor`.
    pub fn validate(&self, cursor: usize, reported: &str) -> &str {
        let expected = self.next_expected(cursor);
        if reported != expected {
            warn!(
                reported = %reported,
                expected = %expected,
                cursor,
                "Step out of sequence, using expected step"
            );
        }
        expected
    }

    /// Progress percentage for the token at `cursor`.
    ///
    /// `min(95, floor(100 * i / (len - 1)))`, and exactly 100 for the
    /// terminal token.
    pub fn progress_at(&self, cursor: usize) -> u8 {
        let last = self.tokens.len().saturating_sub(1);
        if cursor >= last {
            return 100;
        }
        let percent = (100 * cursor / last).min(MAX_RUNNING_PROGRESS);
        percent as u8
    }
}

/// The step a runner should publish next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepUpdate {
    pub token: String,
    pub progress: u8,
    /// The runner reported something other than the expected token
    pub drifted: bool,
}

/// A step sequence together with the position of the next step.
#[derive(Debug, Clone)]
pub struct StepTracker {
    sequence: StepSequence,
    cursor: usize,
}

impl StepTracker {
    pub fn new(sequence: StepSequence) -> Self {
        Self {
            sequence,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expected(&self) -> &str {
        self.sequence.next_expected(self.cursor)
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    /// Consume one step. The cursor moves whether or not `reported` matched.
    pub fn advance(&mut self, reported: &str) -> StepUpdate {
        let index = self.cursor.min(self.sequence.len().saturating_sub(1));
        let token = self.sequence.validate(self.cursor, reported).to_string();
        let update = StepUpdate {
            drifted: token != reported,
            progress: self.sequence.progress_at(index),
            token,
        };
        if self.cursor < self.sequence.len() {
            self.cursor += 1;
        }
        update
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.sequence.len()
    }
}
