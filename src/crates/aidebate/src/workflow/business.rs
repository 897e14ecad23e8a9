//! Business idea workflow
//!
//! Four stages, each driven by its own model:
//!
//! 1. generate `num_ideas` ideas as a JSON array
//! 2. critique every idea as a JSON object
//! 3. refine ideas that received a usable critique
//! 4. rank all ideas and sort them by final score
//!
//! Only a failed generation call is fatal. Unparseable replies and failed
//! calls in later stages degrade to placeholders so the job still completes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info, warn};

use super::extract::{extract_array, extract_object, ExtractError};
use super::reporter::StageReporter;
use crate::job::{Critique, CritiqueOutcome, IdeasResult, Idea, JobResult};
use crate::providers::RoleBinding;
use crate::Result;

pub const CRITIQUE_PARSE_FAILED: &str = "Failed to parse critique";
pub const REFINEMENT_SKIPPED: &str = "Refinement skipped due to missing critique.";
const REFINEMENT_ERROR_PREFIX: &str = "Error during refinement";
const PLACEHOLDER_DESCRIPTION: &str = "Could not parse idea details from LLM response.";
const PLACEHOLDER_UNKNOWN: &str = "Unknown";

/// Business idea launch request. Unset fields take the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub topic: String,
    #[serde(default)]
    pub generator_llm: Option<String>,
    #[serde(default)]
    pub critic_llm: Option<String>,
    #[serde(default)]
    pub refiner_llm: Option<String>,
    #[serde(default)]
    pub judge_llm: Option<String>,
    #[serde(default)]
    pub num_ideas: Option<u32>,
}

impl IdeaRequest {
    pub const DEFAULT_GENERATOR: &'static str = "ChatGPT";
    pub const DEFAULT_CRITIC: &'static str = "Claude";
    pub const DEFAULT_REFINER: &'static str = "Gemini";
    pub const DEFAULT_JUDGE: &'static str = "ChatGPT";
    pub const DEFAULT_NUM_IDEAS: u32 = 3;

    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_models(
        mut self,
        generator: impl Into<String>,
        critic: impl Into<String>,
        refiner: impl Into<String>,
        judge: impl Into<String>,
    ) -> Self {
        self.generator_llm = Some(generator.into());
        self.critic_llm = Some(critic.into());
        self.refiner_llm = Some(refiner.into());
        self.judge_llm = Some(judge.into());
        self
    }

    pub fn with_num_ideas(mut self, num_ideas: u32) -> Self {
        self.num_ideas = Some(num_ideas);
        self
    }
}

/// An idea run with every role bound to a model.
#[derive(Debug, Clone)]
pub struct IdeaConfig {
    pub topic: String,
    pub generator: RoleBinding,
    pub critic: RoleBinding,
    pub refiner: RoleBinding,
    pub judge: RoleBinding,
    pub num_ideas: u32,
}

/// Idea as the generator is asked to return it.
#[derive(Debug, Deserialize)]
struct GeneratedIdea {
    #[serde(default = "untitled")]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    target_market: String,
    #[serde(default)]
    monetization: String,
}

fn untitled() -> String {
    "Untitled Idea".to_string()
}

/// What the judge sees of each idea.
#[derive(Debug, Serialize)]
struct RankingSummary<'a> {
    id: usize,
    title: &'a str,
    description: &'a str,
    target_market: &'a str,
    monetization: &'a str,
    critique_score: f64,
    key_strengths: &'a [String],
    key_weaknesses: &'a [String],
    has_refinement: bool,
}

/// One verdict from the judge.
#[derive(Debug, Default, PartialEq)]
struct RankEntry {
    id: Option<usize>,
    final_score: Option<f64>,
    explanation: Option<String>,
}

impl RankEntry {
    /// Read one array element. Ids and scores may be numbers or numeric strings.
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            id: object.get("id").and_then(as_index),
            final_score: object.get("final_score").and_then(as_number),
            explanation: object
                .get("explanation")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn as_index(value: &Value) -> Option<usize> {
    let number = as_number(value)?;
    (number >= 0.0 && number.fract() == 0.0).then_some(number as usize)
}

/// Parse the judge's array entry by entry, dropping elements that are not objects.
fn parse_ranking(response: &str) -> std::result::Result<Vec<RankEntry>, ExtractError> {
    let values: Vec<Value> = extract_array(response)?;
    Ok(values.iter().filter_map(RankEntry::from_value).collect())
}

/// Run the idea pipeline to completion, recording the outcome in the job record.
pub async fn run_business_ideas(config: IdeaConfig, mut reporter: StageReporter) {
    let job_id = reporter.job_id();
    let started = Instant::now();
    info!(job_id = %job_id, num_ideas = config.num_ideas, "Starting business idea generation for '{}'", config.topic);

    match execute(&config, &mut reporter).await {
        Ok(ideas) => {
            info!(job_id = %job_id, elapsed = ?started.elapsed(), "Business idea generation completed");
            let result = JobResult::BusinessIdeas(IdeasResult {
                topic: config.topic.clone(),
                ideas,
            });
            if let Err(e) = reporter.complete("Business idea generation completed successfully!", result) {
                error!(job_id = %job_id, "Failed to record business idea result: {}", e);
            }
        }
        Err(e) => {
            error!(job_id = %job_id, elapsed = ?started.elapsed(), "Business idea generation failed: {}", e);
            if let Err(write_err) = reporter.fail(&e) {
                error!(job_id = %job_id, "Failed to record business idea error: {}", write_err);
            }
        }
    }
}

async fn execute(config: &IdeaConfig, reporter: &mut StageReporter) -> Result<Vec<Idea>> {
    reporter.advance("step1", "Step 1: Generating business ideas...").await?;
    let mut ideas = generate(config, reporter).await?;

    reporter.advance("step2", "Step 2: Critiquing business ideas...").await?;
    critique(&mut ideas, config, reporter).await?;

    reporter.advance("step3", "Step 3: Refining business ideas...").await?;
    refine(&mut ideas, config, reporter).await?;

    reporter.advance("step4", "Step 4: Ranking business ideas...").await?;
    rank(&mut ideas, config, reporter).await?;

    Ok(ideas)
}

fn generation_prompt(topic: &str, num_ideas: u32) -> String {
    format!(
        r#"Generate {num_ideas} innovative business ideas related to: {topic}

For each idea, provide a catchy title, a detailed description of the business concept,
the target market and potential monetization strategies.

Format your response as a valid JSON array with objects containing these fields:
[
  {{
    "title": "Business Idea Title",
    "description": "Detailed description of the business concept...",
    "target_market": "Description of the target market...",
    "monetization": "Explanation of monetization strategies..."
  }}
]

Be creative, practical, and ensure each idea is distinct from the others."#
    )
}

fn placeholder_ideas(count: u32) -> Vec<Idea> {
    (0..count as usize)
        .map(|i| {
            Idea::new(
                i,
                format!("Business Idea {}", i + 1),
                PLACEHOLDER_DESCRIPTION,
                PLACEHOLDER_UNKNOWN,
                PLACEHOLDER_UNKNOWN,
            )
        })
        .collect()
}

/// Turn the generator's reply into at most `num_ideas` ideas.
fn parse_ideas(response: &str, num_ideas: u32) -> Vec<Idea> {
    match extract_array::<Vec<GeneratedIdea>>(response) {
        Ok(generated) if !generated.is_empty() => generated
            .into_iter()
            .take(num_ideas as usize)
            .enumerate()
            .map(|(i, g)| Idea::new(i, g.title, g.description, g.target_market, g.monetization))
            .collect(),
        Ok(_) => {
            warn!("Generator returned no ideas, creating generic ideas");
            placeholder_ideas(num_ideas)
        }
        Err(e) => {
            warn!("Failed to parse ideas from generator response ({}), creating generic ideas", e);
            placeholder_ideas(num_ideas)
        }
    }
}

async fn generate(config: &IdeaConfig, reporter: &StageReporter) -> Result<Vec<Idea>> {
    reporter
        .note(format!(
            "Generating {} business ideas using {}...",
            config.num_ideas, config.generator.provider
        ))
        .await?;

    let started = Instant::now();
    let response = config
        .generator
        .call(&generation_prompt(&config.topic, config.num_ideas), "idea generation")
        .await?;
    info!("Business ideas generated in {:.2?}", started.elapsed());

    Ok(parse_ideas(&response, config.num_ideas))
}

fn critique_prompt(topic: &str, idea: &Idea) -> String {
    format!(
        r#"Critically evaluate the following business idea related to: {topic}

BUSINESS IDEA:
Title: {title}
Description: {description}
Target Market: {target_market}
Monetization: {monetization}

Score feasibility, market potential, technical complexity (1 is extremely complex, 10 is very simple)
and monetization viability from 1 to 10 with an explanation each. List potential competitors,
give an overall score, at least two key strengths, two key weaknesses and two improvement suggestions.

Format your response as a valid JSON object:
{{
  "feasibility": {{ "score": 7, "explanation": "..." }},
  "market_potential": {{ "score": 8, "explanation": "..." }},
  "technical_complexity": {{ "score": 6, "explanation": "..." }},
  "monetization_viability": {{ "score": 7, "explanation": "..." }},
  "competitive_landscape": ["Competitor 1", "Competitor 2", "Competitor 3"],
  "overall_score": 7.5,
  "key_strengths": ["Strength 1", "Strength 2"],
  "key_weaknesses": ["Weakness 1", "Weakness 2"],
  "improvement_suggestions": ["Suggestion 1", "Suggestion 2"]
}}"#,
        topic = topic,
        title = idea.title,
        description = idea.description,
        target_market = idea.target_market,
        monetization = idea.monetization,
    )
}

async fn critique(ideas: &mut [Idea], config: &IdeaConfig, reporter: &StageReporter) -> Result<()> {
    let total = ideas.len();
    for (i, idea) in ideas.iter_mut().enumerate() {
        reporter
            .note(format!(
                "Critiquing idea {}/{} using {}...",
                i + 1,
                total,
                config.critic.provider
            ))
            .await?;

        let stage = format!("critique of idea {}", i + 1);
        match config.critic.call(&critique_prompt(&config.topic, idea), stage).await {
            Ok(response) => match extract_object::<Critique>(&response) {
                Ok(parsed) => {
                    idea.score = parsed.overall_score.unwrap_or(0.0);
                    idea.critique = Some(CritiqueOutcome::Evaluated(parsed));
                }
                Err(e) => {
                    warn!("Failed to parse critique for idea {}: {}", i + 1, e);
                    idea.critique = Some(CritiqueOutcome::failed(CRITIQUE_PARSE_FAILED));
                }
            },
            Err(e) => {
                error!("Error critiquing idea {}: {}", i + 1, e);
                idea.critique = Some(CritiqueOutcome::failed(format!("Error during critique: {}", e)));
            }
        }
    }
    Ok(())
}

fn refinement_prompt(topic: &str, idea: &Idea, critique: &Critique) -> String {
    format!(
        r#"Refine the following business idea related to: {topic}

ORIGINAL BUSINESS IDEA:
Title: {title}
Description: {description}
Target Market: {target_market}
Monetization: {monetization}

CRITIQUE SUMMARY:
Weaknesses: {weaknesses}
Improvement Suggestions: {suggestions}

Provide a refined version of this business idea that addresses the weaknesses and incorporates
the improvement suggestions. Keep the same basic concept but enhance it. Include a refined title
if needed, an improved description, a more focused target market, enhanced monetization strategies
and a brief explanation of how the refinement addresses the critique.

Format your response in plain text, not as JSON."#,
        topic = topic,
        title = idea.title,
        description = idea.description,
        target_market = idea.target_market,
        monetization = idea.monetization,
        weaknesses = critique.key_weaknesses.join(", "),
        suggestions = critique.improvement_suggestions.join(", "),
    )
}

async fn refine(ideas: &mut [Idea], config: &IdeaConfig, reporter: &StageReporter) -> Result<()> {
    let total = ideas.len();
    for (i, idea) in ideas.iter_mut().enumerate() {
        reporter
            .note(format!(
                "Refining idea {}/{} using {}...",
                i + 1,
                total,
                config.refiner.provider
            ))
            .await?;

        let prompt = match idea.usable_critique() {
            Some(critique) => refinement_prompt(&config.topic, idea, critique),
            None => {
                warn!("Skipping refinement for idea {} due to missing critique", i + 1);
                idea.refinement = Some(REFINEMENT_SKIPPED.to_string());
                continue;
            }
        };

        let stage = format!("refinement of idea {}", i + 1);
        idea.refinement = Some(match config.refiner.call(&prompt, stage).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error refining idea {}: {}", i + 1, e);
                format!("{}: {}", REFINEMENT_ERROR_PREFIX, e)
            }
        });
    }
    Ok(())
}

fn has_refinement(idea: &Idea) -> bool {
    match idea.refinement.as_deref() {
        Some(text) => text != REFINEMENT_SKIPPED && !text.starts_with(REFINEMENT_ERROR_PREFIX),
        None => false,
    }
}

fn ranking_prompt(topic: &str, ideas: &[Idea]) -> serde_json::Result<String> {
    let summaries: Vec<RankingSummary<'_>> = ideas
        .iter()
        .map(|idea| {
            let critique = idea.usable_critique();
            RankingSummary {
                id: idea.id,
                title: &idea.title,
                description: &idea.description,
                target_market: &idea.target_market,
                monetization: &idea.monetization,
                critique_score: idea.score,
                key_strengths: critique.map(|c| c.key_strengths.as_slice()).unwrap_or(&[]),
                key_weaknesses: critique.map(|c| c.key_weaknesses.as_slice()).unwrap_or(&[]),
                has_refinement: has_refinement(idea),
            }
        })
        .collect();
    let summary_json = serde_json::to_string_pretty(&summaries)?;

    Ok(format!(
        r#"Rank the following business ideas related to: {topic}

BUSINESS IDEAS:
{summary_json}

Judge overall business viability, market potential, innovation, execution feasibility and
competitive advantage. For each idea, referenced by its id, give a final score from 1 to 10
and a brief explanation.

Format your response as a valid JSON array sorted from highest to lowest score:
[
  {{
    "id": 0,
    "final_score": 8.5,
    "explanation": "This idea ranks highly because..."
  }}
]"#
    ))
}

/// Apply the judge's scores and explanations, then sort best first.
fn apply_ranking(ideas: &mut [Idea], entries: Vec<RankEntry>) {
    for entry in entries {
        let Some(id) = entry.id else {
            continue;
        };
        let Some(idea) = ideas.iter_mut().find(|idea| idea.id == id) else {
            continue;
        };
        if let Some(score) = entry.final_score {
            idea.score = score;
        }
        if let Some(explanation) = entry.explanation {
            idea.ranking_explanation = Some(explanation);
        }
    }
    // Stable, so ties keep generation order
    ideas.sort_by(|a, b| b.score.total_cmp(&a.score));
}

async fn rank(ideas: &mut [Idea], config: &IdeaConfig, reporter: &StageReporter) -> Result<()> {
    reporter
        .note(format!("Ranking business ideas using {}...", config.judge.provider))
        .await?;

    let prompt = match ranking_prompt(&config.topic, ideas) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!("Failed to summarize ideas for ranking: {}", e);
            return Ok(());
        }
    };

    let started = Instant::now();
    match config.judge.call(&prompt, "ranking").await {
        Ok(response) => match parse_ranking(&response) {
            Ok(entries) => {
                info!("Ideas ranked in {:.2?}", started.elapsed());
                apply_ranking(ideas, entries);
            }
            Err(e) => warn!("Failed to parse ranking response: {}", e),
        },
        Err(e) => error!("Error ranking ideas: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(id: usize, score: f64) -> Idea {
        let mut idea = Idea::new(id, format!("Idea {}", id), "d", "m", "$");
        idea.score = score;
        idea
    }

    #[test]
    fn test_parse_ideas_truncates() {
        let response = r#"Here are your ideas:
[
  {"title": "A", "description": "a", "target_market": "x", "monetization": "y"},
  {"title": "B", "description": "b", "target_market": "x", "monetization": "y"},
  {"title": "C", "description": "c", "target_market": "x", "monetization": "y"}
]"#;
        let ideas = parse_ideas(response, 2);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "A");
        assert_eq!(ideas[1].id, 1);
    }

    #[test]
    fn test_parse_ideas_fills_missing_fields() {
        let ideas = parse_ideas(r#"[{"description": "only this"}]"#, 3);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "Untitled Idea");
        assert_eq!(ideas[0].target_market, "");
    }

    #[test]
    fn test_parse_ideas_placeholders() {
        for response in ["no json here", "[not json]", "[]"] {
            let ideas = parse_ideas(response, 3);
            assert_eq!(ideas.len(), 3);
            assert_eq!(ideas[0].title, "Business Idea 1");
            assert_eq!(ideas[2].title, "Business Idea 3");
            assert_eq!(ideas[1].description, PLACEHOLDER_DESCRIPTION);
            assert_eq!(ideas[1].target_market, "Unknown");
            assert_eq!(ideas[1].monetization, "Unknown");
        }
    }

    #[test]
    fn test_apply_ranking_sorts_descending() {
        let mut ideas = vec![idea(0, 5.0), idea(1, 6.0), idea(2, 7.0)];
        let entries = vec![
            RankEntry {
                id: Some(0),
                final_score: Some(9.0),
                explanation: Some("Best".to_string()),
            },
            RankEntry {
                id: Some(2),
                final_score: None,
                explanation: None,
            },
            RankEntry {
                id: Some(7),
                final_score: Some(10.0),
                explanation: None,
            },
        ];

        apply_ranking(&mut ideas, entries);

        let order: Vec<usize> = ideas.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![0, 2, 1]);
        assert_eq!(ideas[0].score, 9.0);
        assert_eq!(ideas[0].ranking_explanation.as_deref(), Some("Best"));
        // Missing score keeps the critique score
        assert_eq!(ideas[1].score, 7.0);
        assert!(ideas[1].ranking_explanation.is_none());
    }

    #[test]
    fn test_parse_ranking_tolerates_loose_entries() {
        let response = r#"Ranking:
[
  {"id": 2, "final_score": 8.5, "explanation": "Clear demand"},
  {"id": "0", "final_score": "7", "explanation": "Solid"},
  {"id": 1.0, "final_score": 6},
  {"id": -1, "final_score": 9},
  {"id": 1.5, "final_score": 9},
  "not an entry",
  {"final_score": "high"}
]"#;
        let entries = parse_ranking(response).unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(
            entries[0],
            RankEntry {
                id: Some(2),
                final_score: Some(8.5),
                explanation: Some("Clear demand".to_string()),
            }
        );
        assert_eq!(entries[1].id, Some(0));
        assert_eq!(entries[1].final_score, Some(7.0));
        assert_eq!(entries[2].id, Some(1));
        assert_eq!(entries[2].final_score, Some(6.0));
        assert_eq!(entries[3].id, None);
        assert_eq!(entries[4].id, None);
        assert_eq!(entries[5], RankEntry::default());
    }

    #[test]
    fn test_loose_ranking_still_sorts() {
        let mut ideas = vec![idea(0, 5.0), idea(1, 6.0), idea(2, 7.0)];
        let entries =
            parse_ranking(r#"[{"id": "0", "final_score": 9}, {"id": 2.0, "final_score": "1"}]"#).unwrap();
        apply_ranking(&mut ideas, entries);

        let order: Vec<usize> = ideas.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(ideas[2].score, 1.0);
    }

    #[test]
    fn test_parse_ranking_requires_array() {
        assert!(parse_ranking("I liked them all").is_err());
    }

    #[test]
    fn test_apply_ranking_is_stable_on_ties() {
        let mut ideas = vec![idea(0, 5.0), idea(1, 5.0), idea(2, 5.0)];
        apply_ranking(&mut ideas, vec![]);
        let order: Vec<usize> = ideas.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_has_refinement() {
        let mut subject = idea(0, 0.0);
        assert!(!has_refinement(&subject));

        subject.refinement = Some(REFINEMENT_SKIPPED.to_string());
        assert!(!has_refinement(&subject));

        subject.refinement = Some("Error during refinement: timeout".to_string());
        assert!(!has_refinement(&subject));

        subject.refinement = Some("A sharper version".to_string());
        assert!(has_refinement(&subject));
    }

    #[test]
    fn test_ranking_prompt_lists_ideas() {
        let mut first = idea(0, 6.5);
        first.critique = Some(CritiqueOutcome::Evaluated(Critique {
            key_strengths: vec!["Cheap".to_string()],
            ..Critique::default()
        }));
        let second = idea(1, 0.0);

        let prompt = ranking_prompt("pets", &[first, second]).unwrap();
        assert!(prompt.contains("related to: pets"));
        assert!(prompt.contains("\"critique_score\": 6.5"));
        assert!(prompt.contains("\"Cheap\""));
        assert!(prompt.contains("\"id\": 1"));
    }

    #[test]
    fn test_refinement_prompt_includes_critique() {
        let subject = idea(0, 0.0);
        let critique = Critique {
            key_weaknesses: vec!["Slow".to_string(), "Costly".to_string()],
            improvement_suggestions: vec!["Automate".to_string()],
            ..Critique::default()
        };
        let prompt = refinement_prompt("pets", &subject, &critique);
        assert!(prompt.contains("Weaknesses: Slow, Costly"));
        assert!(prompt.contains("Improvement Suggestions: Automate"));
    }
}
