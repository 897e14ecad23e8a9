//! Result payloads of completed jobs

use serde::{Deserialize, Serialize};

/// Payload attached to a successfully completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobResult {
    Debate(DebateResult),
    BusinessIdeas(IdeasResult),
}

/// Arguments as they stood entering one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRound {
    pub round_number: u32,
    pub pro_argument: String,
    pub con_argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateResult {
    pub rounds: Vec<DebateRound>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeasResult {
    pub topic: String,
    /// Ranked best first
    pub ideas: Vec<Idea>,
}

/// A generated business idea and everything learned about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    /// Position in the generated list, referenced by the ranking stage
    pub id: usize,
    pub title: String,
    pub description: String,
    pub target_market: String,
    pub monetization: String,
    pub critique: Option<CritiqueOutcome>,
    pub refinement: Option<String>,
    pub score: f64,
    pub ranking_explanation: Option<String>,
}

impl Idea {
    pub fn new(
        id: usize,
        title: impl Into<String>,
        description: impl Into<String>,
        target_market: impl Into<String>,
        monetization: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            target_market: target_market.into(),
            monetization: monetization.into(),
            critique: None,
            refinement: None,
            score: 0.0,
            ranking_explanation: None,
        }
    }

    /// The critique, if the critic produced a usable one.
    pub fn usable_critique(&self) -> Option<&Critique> {
        match &self.critique {
            Some(CritiqueOutcome::Evaluated(critique)) => Some(critique),
            _ => None,
        }
    }
}

/// Outcome of critiquing one idea.
///
/// Serialized as the critique object itself, or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CritiqueOutcome {
    Failed { error: String },
    Evaluated(Critique),
}

impl CritiqueOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        CritiqueOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CritiqueOutcome::Failed { error } => Some(error),
            CritiqueOutcome::Evaluated(_) => None,
        }
    }
}

/// Structured critique returned by the critic model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    #[serde(default)]
    pub feasibility: Option<ScoredAspect>,
    #[serde(default)]
    pub market_potential: Option<ScoredAspect>,
    #[serde(default)]
    pub technical_complexity: Option<ScoredAspect>,
    #[serde(default)]
    pub monetization_viability: Option<ScoredAspect>,
    #[serde(default)]
    pub competitive_landscape: Vec<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub key_weaknesses: Vec<String>,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
}

/// A 1-10 score with its justification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredAspect {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_critique_shape() {
        let outcome = CritiqueOutcome::failed("Failed to parse critique");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, serde_json::json!({"error": "Failed to parse critique"}));

        let back: CritiqueOutcome = serde_json::from_value(value).unwrap();
        assert_eq!(back.error(), Some("Failed to parse critique"));
    }

    #[test]
    fn test_evaluated_critique_is_not_mistaken_for_failure() {
        let value = serde_json::json!({
            "feasibility": {"score": 7, "explanation": "Doable"},
            "overall_score": 7.5,
            "key_strengths": ["Cheap"],
            "key_weaknesses": ["Crowded"]
        });
        let outcome: CritiqueOutcome = serde_json::from_value(value).unwrap();

        assert!(outcome.error().is_none());
        match outcome {
            CritiqueOutcome::Evaluated(critique) => {
                assert_eq!(critique.overall_score, Some(7.5));
                assert_eq!(critique.feasibility.and_then(|f| f.score), Some(7.0));
            }
            CritiqueOutcome::Failed { .. } => panic!("expected an evaluated critique"),
        }
    }

    #[test]
    fn test_job_result_variants_deserialize() {
        let debate: JobResult = serde_json::from_value(serde_json::json!({
            "rounds": [{"round_number": 1, "pro_argument": "Yes", "con_argument": "No"}],
            "summary": "Even"
        }))
        .unwrap();
        assert!(matches!(debate, JobResult::Debate(_)));

        let ideas: JobResult = serde_json::from_value(serde_json::json!({
            "topic": "pets",
            "ideas": []
        }))
        .unwrap();
        assert!(matches!(ideas, JobResult::BusinessIdeas(_)));
    }

    #[test]
    fn test_usable_critique() {
        let mut idea = Idea::new(0, "A", "B", "C", "D");
        assert!(idea.usable_critique().is_none());

        idea.critique = Some(CritiqueOutcome::failed("Failed to parse critique"));
        assert!(idea.usable_critique().is_none());

        idea.critique = Some(CritiqueOutcome::Evaluated(Critique::default()));
        assert!(idea.usable_critique().is_some());
    }
}
