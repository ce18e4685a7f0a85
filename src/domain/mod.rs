//! Domain types for idearalph
//!
//! - Idea: the candidate under refinement, with its status and dope level
//! - IdeaIteration: immutable snapshot of one pass
//! - PmfScores / PmfScoresFull: six- and ten-dimension quality scores
//! - RalphLoopResult: terminal summary of a loop run

pub mod idea;
pub mod iteration;
pub mod outcome;
pub mod scores;

pub use idea::{DopeLevel, Idea, IdeaStatus};
pub use iteration::IdeaIteration;
pub use outcome::{Mood, RalphLoopResult, StatusMessage};
pub use scores::{Dimensions, MAX_SCORE, MIN_SCORE, PmfScores, PmfScoresFull, field_label};
