//! Loop runner module - bounded refinement loops.
//!
//! This module provides:
//! - LoopRunner: the Ralph Loop (generate, then refine by dope level)
//! - ScoreLoop: critique/improve/re-score by average PMF score

mod loop_runner;
mod score_loop;

pub use loop_runner::{DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_ITERATIONS_CAP, LoopConfig, LoopRunner, LoopRunnerConfig};
pub use score_loop::{
    DEFAULT_SCORE_ITERATIONS, DEFAULT_TARGET_SCORE, MAX_MODE_TARGET, MAX_SCORE_ITERATIONS, RefineMode, ScoreIteration,
    ScoreLoop, ScoreLoopConfig, ScoreLoopResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify module exports are accessible
        let _config = LoopConfig::default();
        let _mode = RefineMode::default();
        assert_eq!(ScoreLoopConfig::default().target_score, DEFAULT_TARGET_SCORE);
    }
}
