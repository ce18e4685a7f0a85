//! Score loop - repeated critique/improve/re-score on ten dimensions.
//!
//! Unlike the Ralph Loop this starts from caller text and judges progress by
//! the average PMF score instead of the dope level.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Dimensions, PmfScoresFull};
use crate::engine::RalphEngine;
use crate::error::{IdeaRalphError, Result};
use crate::scoring::should_continue;

/// Target used by `RefineMode::Max`; no average can reach it
pub const MAX_MODE_TARGET: f64 = 10.1;

pub const DEFAULT_TARGET_SCORE: f64 = 9.5;
pub const DEFAULT_SCORE_ITERATIONS: u32 = 10;
pub const MAX_SCORE_ITERATIONS: u32 = 20;

/// How long to keep refining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefineMode {
    /// Exactly one round
    Single,
    /// Until the target average is reached
    #[default]
    Target,
    /// Every allowed round
    Max,
}

impl RefineMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(Self::Single),
            "target" => Some(Self::Target),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Target => "target",
            Self::Max => "max",
        }
    }
}

impl std::fmt::Display for RefineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLoopConfig {
    pub mode: RefineMode,
    pub target_score: f64,
    pub max_iterations: u32,
}

impl Default for ScoreLoopConfig {
    fn default() -> Self {
        Self {
            mode: RefineMode::Target,
            target_score: DEFAULT_TARGET_SCORE,
            max_iterations: DEFAULT_SCORE_ITERATIONS,
        }
    }
}

impl ScoreLoopConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.target_score.is_finite() || !(1.0..=10.0).contains(&self.target_score) {
            return Err(IdeaRalphError::Validation(format!(
                "targetScore must be between 1 and 10, got {}",
                self.target_score
            )));
        }
        if !(1..=MAX_SCORE_ITERATIONS).contains(&self.max_iterations) {
            return Err(IdeaRalphError::Validation(format!(
                "maxIterations must be between 1 and {}, got {}",
                MAX_SCORE_ITERATIONS, self.max_iterations
            )));
        }
        Ok(())
    }

    /// Iteration budget after the mode is applied
    pub fn effective_max_iterations(&self) -> u32 {
        match self.mode {
            RefineMode::Single => 1,
            _ => self.max_iterations,
        }
    }

    /// Stop threshold after the mode is applied
    pub fn effective_target(&self) -> f64 {
        match self.mode {
            RefineMode::Max => MAX_MODE_TARGET,
            _ => self.target_score,
        }
    }
}

/// One round of the score loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreIteration {
    /// 1-based
    pub iteration: u32,
    pub scores: PmfScoresFull,
    pub average: f64,
    pub feedback: String,
    /// Improved idea produced by this round
    pub idea: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLoopResult {
    pub mode: RefineMode,
    pub iterations: Vec<ScoreIteration>,
    pub final_scores: PmfScoresFull,
    pub final_average: f64,
    pub final_idea: String,
}

pub struct ScoreLoop {
    engine: Arc<RalphEngine>,
}

impl ScoreLoop {
    pub fn new(engine: Arc<RalphEngine>) -> Self {
        Self { engine }
    }

    pub async fn run(&self, idea: &str, config: &ScoreLoopConfig) -> Result<ScoreLoopResult> {
        config.validate()?;

        let max_iterations = config.effective_max_iterations();
        let target = config.effective_target();
        let prompt_target = match config.mode {
            RefineMode::Max => None,
            _ => Some(target),
        };

        tracing::info!(mode = %config.mode, max_iterations, target, "Score loop starting");

        let mut current = idea.to_string();
        let mut last_average = f64::NEG_INFINITY;
        let mut iterations: Vec<ScoreIteration> = Vec::new();
        let mut i = 0;

        while should_continue(last_average, i, max_iterations, target) {
            let round = self
                .engine
                .score_refine(&current, i + 1, max_iterations, prompt_target)
                .await?;

            let average = round.scores.aggregate();
            current = round.improved_idea.clone();
            last_average = average;
            i += 1;

            tracing::info!(iteration = i, average, "Score loop round complete");

            iterations.push(ScoreIteration {
                iteration: i,
                scores: round.scores,
                average,
                feedback: round.feedback,
                idea: round.improved_idea,
            });

            if round.should_continue == Some(false) {
                tracing::debug!(iteration = i, "Model suggested stopping");
                break;
            }
        }

        let last = iterations
            .last()
            .ok_or_else(|| IdeaRalphError::Validation("score loop ran no iterations".to_string()))?;

        Ok(ScoreLoopResult {
            mode: config.mode,
            final_scores: last.scores,
            final_average: last.average,
            final_idea: current,
            iterations,
        })
    }
}
