//! Records the model is asked to return, one per prompt mode
//!
//! Field names match the JSON contracts in `prompt::templates`. Every record
//! is range-checked by `Validate` right after extraction.

use serde::{Deserialize, Serialize};

use crate::domain::idea::deserialize_reported;
use crate::domain::{Dimensions, DopeLevel, PmfScores, PmfScoresFull};
use crate::llm::Validate;

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("field '{}' is empty", field));
    }
    Ok(())
}

/// Output of a generate or refine pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDraft {
    pub name: String,
    pub idea: String,
    #[serde(default)]
    pub ralph_quote: Option<String>,
    pub pmf_scores: PmfScores,
    /// Clamped into 0..=5 on the way in
    #[serde(deserialize_with = "deserialize_reported")]
    pub dope_level: DopeLevel,
    #[serde(default)]
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_made: Option<String>,
    /// The model's own opinion on whether another pass would help
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_continue: Option<bool>,
}

impl Validate for IdeaDraft {
    fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_text("idea", &self.idea)?;
        self.pmf_scores.validate()
    }
}

/// Output of an evaluate pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub pmf_scores: PmfScores,
    #[serde(deserialize_with = "deserialize_reported")]
    pub dope_level: DopeLevel,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub ralph_quote: Option<String>,
}

impl Validate for Evaluation {
    fn validate(&self) -> Result<(), String> {
        self.pmf_scores.validate()
    }
}

/// Ten-dimension score of an idea, plus a suggested improvement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub scores: PmfScoresFull,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub improved_idea: Option<String>,
}

impl ScoreReport {
    pub fn average(&self) -> f64 {
        self.scores.aggregate()
    }
}

impl Validate for ScoreReport {
    fn validate(&self) -> Result<(), String> {
        self.scores.validate()
    }
}

/// One critique-improve-rescore round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRefinement {
    pub improved_idea: String,
    pub scores: PmfScoresFull,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub should_continue: Option<bool>,
}

impl Validate for ScoreRefinement {
    fn validate(&self) -> Result<(), String> {
        require_text("improvedIdea", &self.improved_idea)?;
        self.scores.validate()
    }
}
