//! Loop runner implementation - executes the Ralph Loop.
//!
//! One generation pass, then refinement passes until the dope threshold is
//! reached, the iteration budget runs out, or the model says it is done.
//! Every pass is a fresh, independent model call; state lives in the `Idea`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{DopeLevel, Idea, IdeaIteration, IdeaStatus, RalphLoopResult};
use crate::engine::{IdeaDraft, RalphEngine};
use crate::error::{IdeaRalphError, Result};
use crate::scoring::should_continue;

/// Default refinement budget per run
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Default hard cap on the refinement budget
pub const DEFAULT_MAX_ITERATIONS_CAP: u32 = 10;

/// Per-run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopConfig {
    pub max_iterations: u32,
    pub dope_threshold: u8,
    pub chaos_level: u8,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            dope_threshold: DopeLevel::GOLD_STAR.value(),
            chaos_level: 5,
            user_id: None,
        }
    }
}

impl LoopConfig {
    /// Reject out-of-range settings before any model call
    pub fn validate(&self, max_iterations_cap: u32) -> Result<()> {
        if self.max_iterations < 1 || self.max_iterations > max_iterations_cap {
            return Err(IdeaRalphError::Validation(format!(
                "maxIterations must be between 1 and {}, got {}",
                max_iterations_cap, self.max_iterations
            )));
        }
        if !(1..=DopeLevel::MAX.value()).contains(&self.dope_threshold) {
            return Err(IdeaRalphError::Validation(format!(
                "dopeThreshold must be between 1 and {}, got {}",
                DopeLevel::MAX,
                self.dope_threshold
            )));
        }
        if !(1..=10).contains(&self.chaos_level) {
            return Err(IdeaRalphError::Validation(format!(
                "chaosLevel must be between 1 and 10, got {}",
                self.chaos_level
            )));
        }
        Ok(())
    }
}

/// Configuration for the LoopRunner itself.
#[derive(Debug, Clone)]
pub struct LoopRunnerConfig {
    pub max_iterations_cap: u32,
}

impl Default for LoopRunnerConfig {
    fn default() -> Self {
        Self {
            max_iterations_cap: DEFAULT_MAX_ITERATIONS_CAP,
        }
    }
}

/// LoopRunner drives the generate → refine cycle.
pub struct LoopRunner {
    engine: Arc<RalphEngine>,
    config: LoopRunnerConfig,
}

impl LoopRunner {
    pub fn new(engine: Arc<RalphEngine>) -> Self {
        Self::with_config(engine, LoopRunnerConfig::default())
    }

    pub fn with_config(engine: Arc<RalphEngine>, config: LoopRunnerConfig) -> Self {
        Self { engine, config }
    }

    /// Run one loop to completion.
    ///
    /// Any gateway or extraction failure aborts the whole run; there is no
    /// partial result.
    pub async fn run(&self, config: &LoopConfig, prompt: Option<&str>) -> Result<RalphLoopResult> {
        config.validate(self.config.max_iterations_cap)?;

        let max_iterations = config.max_iterations;
        let threshold = DopeLevel::new(config.dope_threshold);
        let chaos_level = config.chaos_level;

        tracing::info!(
            max_iterations,
            threshold = %threshold,
            chaos_level,
            "Ralph loop starting"
        );

        let initial = self.engine.generate_idea(chaos_level, prompt).await?;

        let mut idea = Idea::new(initial.name.clone(), initial.idea.clone(), max_iterations, chaos_level);
        idea.user_id = config.user_id.clone();
        idea.context = serde_json::json!({
            "prompt": prompt,
            "userId": config.user_id,
        });
        apply_scores(&mut idea, &initial);

        let mut iterations = vec![IdeaIteration::snapshot(&idea, 0, None)];
        tracing::info!(idea_id = %idea.id, iteration = 0, dope_level = %idea.dope_level, "Idea generated");

        let mut iteration_count = 0;
        while should_continue(
            idea.dope_level.as_f64(),
            iteration_count,
            max_iterations,
            threshold.as_f64(),
        ) {
            iteration_count += 1;
            idea.status = IdeaStatus::Refining;
            idea.iteration = iteration_count;

            let refined = self
                .engine
                .refine_idea(
                    idea.current_text(),
                    idea.dope_level,
                    iteration_count,
                    max_iterations,
                    None,
                    chaos_level,
                )
                .await?;

            idea.name = refined.name.clone();
            idea.refined_idea = Some(refined.idea.clone());
            apply_scores(&mut idea, &refined);
            idea.touch();

            iterations.push(IdeaIteration::snapshot(&idea, iteration_count, refined.changes_made.clone()));

            tracing::info!(
                idea_id = %idea.id,
                iteration = iteration_count,
                dope_level = %idea.dope_level,
                "Refinement pass complete"
            );

            if refined.should_continue == Some(false) {
                tracing::debug!(idea_id = %idea.id, iteration = iteration_count, "Model suggested stopping");
                break;
            }
        }

        let success = idea.dope_level >= threshold;
        idea.status = if success {
            IdeaStatus::Completed
        } else {
            IdeaStatus::Sandbox
        };
        idea.touch();

        tracing::info!(
            idea_id = %idea.id,
            success,
            dope_level = %idea.dope_level,
            total_iterations = iteration_count + 1,
            "Ralph loop finished"
        );

        Ok(RalphLoopResult {
            success,
            final_dope_level: idea.dope_level,
            idea,
            iterations,
            total_iterations: iteration_count + 1,
        })
    }
}

fn apply_scores(idea: &mut Idea, draft: &IdeaDraft) {
    idea.ralph_quote = draft.ralph_quote.clone();
    idea.dope_level = draft.dope_level;
    idea.pmf_scores = Some(draft.pmf_scores);
    idea.feedback = Some(draft.feedback.clone()).filter(|f| !f.is_empty());
}
