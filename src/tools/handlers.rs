//! Tool handlers
//!
//! Each handler takes already-validated input, makes its model calls through
//! the engine and returns both a JSON value and markdown for humans.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::plan::build_plan;
use crate::domain::{Dimensions, PmfScoresFull, field_label};
use crate::engine::RalphEngine;
use crate::error::Result;
use crate::llm::Validate;
use crate::prompt::DetailLevel;
use crate::runner::{
    DEFAULT_SCORE_ITERATIONS, DEFAULT_TARGET_SCORE, MAX_SCORE_ITERATIONS, RefineMode, ScoreLoop, ScoreLoopConfig,
};

/// Result of any tool call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub structured: Value,
    pub text: String,
}

fn require_non_empty(field: &str, value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("'{}' must not be empty", field));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainstormInput {
    pub topic: String,
    #[serde(default)]
    pub constraints: Option<String>,
}

impl BrainstormInput {
    /// The idea text that actually gets scored
    pub fn synthesized_idea(&self) -> String {
        match self.constraints.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(c) => format!("A startup in the {} space with these constraints: {}", self.topic, c),
            None => format!("A startup in the {} space", self.topic),
        }
    }
}

impl Validate for BrainstormInput {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_empty("topic", &self.topic)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateInput {
    pub idea: String,
}

impl Validate for ValidateInput {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_empty("idea", &self.idea)
    }
}

fn default_target() -> f64 {
    DEFAULT_TARGET_SCORE
}

fn default_iterations() -> u32 {
    DEFAULT_SCORE_ITERATIONS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineInput {
    pub idea: String,
    #[serde(default)]
    pub mode: RefineMode,
    #[serde(default = "default_target")]
    pub target_score: f64,
    #[serde(default = "default_iterations")]
    pub max_iterations: u32,
}

impl RefineInput {
    pub fn loop_config(&self) -> ScoreLoopConfig {
        ScoreLoopConfig {
            mode: self.mode,
            target_score: self.target_score,
            max_iterations: self.max_iterations,
        }
    }
}

impl Validate for RefineInput {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_empty("idea", &self.idea)?;
        if !(1.0..=10.0).contains(&self.target_score) {
            return Err(format!("'targetScore' must be between 1 and 10, got {}", self.target_score));
        }
        if !(1..=MAX_SCORE_ITERATIONS).contains(&self.max_iterations) {
            return Err(format!(
                "'maxIterations' must be between 1 and {}, got {}",
                MAX_SCORE_ITERATIONS, self.max_iterations
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdInput {
    pub idea: String,
    #[serde(default)]
    pub level: DetailLevel,
    #[serde(default)]
    pub scores: Option<PmfScoresFull>,
    #[serde(default)]
    pub include_architecture: bool,
}

impl Validate for PrdInput {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_empty("idea", &self.idea)?;
        match &self.scores {
            Some(scores) => scores.validate(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureInput {
    pub idea: String,
    /// Accepted for context; the plan itself is keyword-driven
    #[serde(default)]
    pub prd: Option<String>,
    #[serde(default)]
    pub tech_preferences: Option<String>,
}

impl Validate for ArchitectureInput {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_empty("idea", &self.idea)
    }
}

/// Which step the caller just finished, for next-step suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Brainstorm,
    Validate,
    Refine,
    Prd,
}

/// `- **Market Size**: 7/10` lines
pub fn format_scores<D: Dimensions>(scores: &D) -> String {
    scores
        .named()
        .into_iter()
        .map(|(field, value)| format!("- **{}**: {}/10", field_label(field), value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_score_result(idea: &str, scores: &PmfScoresFull, feedback: &str) -> String {
    let mut out = String::from("# Startup Idea Analysis\n\n");
    out.push_str(&format!("## The Idea\n{}\n\n", idea));
    out.push_str(&format!("## PMF Score: {:.2}/10\n\n", scores.aggregate()));
    out.push_str(&format!("### Breakdown\n{}\n\n", format_scores(scores)));
    out.push_str(&format!("## Feedback\n{}\n\n", feedback));
    out
}

/// Suggested follow-up, keyed by stage and average score
pub fn next_steps(stage: Stage, average: f64) -> String {
    let mut out = String::new();

    match stage {
        Stage::Brainstorm | Stage::Validate => {
            if average < 7.0 {
                out.push_str(&format!("Your idea scores {:.1}/10. Consider refining it!\n\n", average));
                out.push_str(
                    "**Suggested**: Run `idearalph_refine` with mode=\"target\" to automatically improve the idea.\n\n",
                );
                out.push_str("Options:\n");
                out.push_str("- `mode: \"single\"` - Get one round of improvements\n");
                out.push_str("- `mode: \"target\"` - Keep refining until score >= 9.5\n");
                out.push_str("- `mode: \"max\"` - Run all iterations for maximum polish\n");
            } else if average < 9.0 {
                out.push_str(&format!(
                    "Good foundation at {:.1}/10! A few more iterations could make it great.\n\n",
                    average
                ));
                out.push_str("**Suggested**: Run `idearalph_refine` with mode=\"target\" targetScore=9.5\n");
            } else {
                out.push_str(&format!(
                    "Excellent score of {:.1}/10! Ready for documentation.\n\n",
                    average
                ));
                out.push_str("**Suggested**: Run `idearalph_prd` to generate a PRD\n");
                out.push_str("- `level: \"napkin\"` - Quick sketch\n");
                out.push_str("- `level: \"science-fair\"` - Detailed PRD\n");
                out.push_str("- `level: \"genius\"` - Investor-ready document\n");
            }
        }
        Stage::Refine => {
            out.push_str(&format!("Your refined idea scores {:.1}/10!\n\n", average));
            out.push_str("**Ready to build?** Generate a PRD:\n");
            out.push_str("- `idearalph_prd` with `level: \"science-fair\"` and `includeArchitecture: true`\n");
        }
        Stage::Prd => {
            out.push_str("PRD generated! Ready to build?\n\n");
            out.push_str("**Next step**: Run `idearalph_architecture` to get:\n");
            out.push_str("- Implementation plan\n");
            out.push_str("- Recommended skills per phase\n");
            out.push_str("- Tech stack guidance\n");
        }
    }

    out
}

fn next_steps_section(stage: Stage, average: f64) -> String {
    format!("---\n\n## What's Next?\n\n{}", next_steps(stage, average))
}

fn score_output(idea: &str, scores: &PmfScoresFull, feedback: &str, stage: Stage) -> ToolOutput {
    let average = scores.aggregate();
    let steps = next_steps(stage, average);
    let mut text = format_score_result(idea, scores, feedback);
    text.push_str(&next_steps_section(stage, average));

    ToolOutput {
        structured: json!({
            "idea": idea,
            "scores": scores,
            "average": average,
            "feedback": feedback,
            "next_steps": steps,
        }),
        text,
    }
}

pub async fn brainstorm(engine: &RalphEngine, input: &BrainstormInput) -> Result<ToolOutput> {
    let seed = input.synthesized_idea();
    let report = engine.score_idea(&seed).await?;
    let idea = report
        .improved_idea
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .unwrap_or(&seed);
    Ok(score_output(idea, &report.scores, &report.feedback, Stage::Brainstorm))
}

pub async fn validate(engine: &RalphEngine, input: &ValidateInput) -> Result<ToolOutput> {
    let report = engine.score_idea(&input.idea).await?;
    Ok(score_output(&input.idea, &report.scores, &report.feedback, Stage::Validate))
}

pub async fn refine(engine: Arc<RalphEngine>, input: &RefineInput) -> Result<ToolOutput> {
    let result = ScoreLoop::new(engine).run(&input.idea, &input.loop_config()).await?;

    let mut text = String::from("# Ralph Loop Results\n\n");
    text.push_str(&format!(
        "**Mode**: {} | **Iterations**: {} | **Final Score**: {:.2}/10\n\n",
        result.mode,
        result.iterations.len(),
        result.final_average
    ));
    text.push_str(&format!("## Final Refined Idea\n\n{}\n\n", result.final_idea));
    text.push_str(&format!("## PMF Scores\n\n{}\n\n", format_scores(&result.final_scores)));

    if result.iterations.len() > 1 {
        text.push_str("## Iteration Journey\n\n");
        text.push_str("| # | Score | Key Improvement |\n");
        text.push_str("|---|-------|----------------|\n");
        for iteration in &result.iterations {
            let first_sentence = iteration.feedback.split('.').next().unwrap_or_default();
            let short: String = first_sentence.chars().take(60).collect();
            text.push_str(&format!(
                "| {} | {:.2} | {}... |\n",
                iteration.iteration, iteration.average, short
            ));
        }
        text.push('\n');
    }

    text.push_str(&next_steps_section(Stage::Refine, result.final_average));

    Ok(ToolOutput {
        structured: serde_json::to_value(&result)?,
        text,
    })
}

pub async fn prd(engine: &RalphEngine, input: &PrdInput) -> Result<ToolOutput> {
    let scores = match input.scores {
        Some(scores) => scores,
        None => engine.score_idea(&input.idea).await?.scores,
    };

    let document = engine.generate_prd(&input.idea, &scores, input.level).await?;
    let average = scores.aggregate();

    let mut text = format!("# PRD: {} Level\n\n", input.level.display_name());
    text.push_str(&format!("## PMF Scores\n{}\n\n", format_scores(&scores)));
    text.push_str(&format!("---\n\n{}\n\n", document));

    let architecture = input
        .include_architecture
        .then(|| build_plan(&input.idea, input.level, None));

    match &architecture {
        Some(plan) => {
            text.push_str("---\n\n");
            text.push_str(plan);
        }
        None => text.push_str(&next_steps_section(Stage::Prd, average)),
    }

    Ok(ToolOutput {
        structured: json!({
            "level": input.level,
            "scores": scores,
            "average": average,
            "prd": document,
            "architecture": architecture,
        }),
        text,
    })
}

pub fn architecture(input: &ArchitectureInput) -> ToolOutput {
    let plan = build_plan(
        &input.idea,
        DetailLevel::Comprehensive,
        input.tech_preferences.as_deref(),
    );
    ToolOutput {
        structured: json!({ "plan": plan }),
        text: plan,
    }
}
