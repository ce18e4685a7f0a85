//! Immutable snapshot of one generation or refinement pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::idea::{DopeLevel, Idea};
use super::scores::PmfScores;
use crate::id::generate_iteration_id;

/// One pass of the Ralph Loop; sequence 0 is the initial generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaIteration {
    pub id: String,
    pub idea_id: String,
    pub iteration_number: u32,
    pub idea_content: String,
    pub dope_level: DopeLevel,
    pub pmf_scores: Option<PmfScores>,
    pub ralph_feedback: Option<String>,
    /// What changed since the previous pass; `None` for the first
    pub changes_made: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl IdeaIteration {
    /// Snapshot the idea's current state as pass `number`
    pub fn snapshot(idea: &Idea, number: u32, changes_made: Option<String>) -> Self {
        Self {
            id: generate_iteration_id(&idea.id, number),
            idea_id: idea.id.clone(),
            iteration_number: number,
            idea_content: idea.current_text().to_string(),
            dope_level: idea.dope_level,
            pmf_scores: idea.pmf_scores,
            ralph_feedback: idea.feedback.clone(),
            changes_made,
            created_at: Utc::now(),
        }
    }
}
