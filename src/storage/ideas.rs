//! Idea persistence
//!
//! Maps the domain types onto two flat collections. Idea rows carry the six
//! PMF scores as individual columns; iteration rows keep them as a JSON blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Filter, HasId, Storage};
use crate::domain::{DopeLevel, Idea, IdeaIteration, IdeaStatus, PmfScores, RalphLoopResult};
use crate::error::{IdeaRalphError, Result};

pub const IDEAS: &str = "ideas";
pub const ITERATIONS: &str = "idea_iterations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub raw_idea: String,
    pub refined_idea: Option<String>,
    pub ralph_quote: Option<String>,
    pub feedback: Option<String>,
    pub status: IdeaStatus,
    pub dope_level: DopeLevel,
    pub iteration: u32,
    pub max_iterations: u32,
    pub pmf_market_size: Option<f64>,
    pub pmf_problem_severity: Option<f64>,
    pub pmf_solution_fit: Option<f64>,
    pub pmf_competition: Option<f64>,
    pub pmf_vibe_codeable: Option<f64>,
    pub pmf_virality: Option<f64>,
    pub chaos_level: u8,
    pub context: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasId for IdeaRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<&Idea> for IdeaRecord {
    fn from(idea: &Idea) -> Self {
        let scores = idea.pmf_scores.as_ref();
        Self {
            id: idea.id.clone(),
            user_id: idea.user_id.clone(),
            name: idea.name.clone(),
            raw_idea: idea.raw_idea.clone(),
            refined_idea: idea.refined_idea.clone(),
            ralph_quote: idea.ralph_quote.clone(),
            feedback: idea.feedback.clone(),
            status: idea.status,
            dope_level: idea.dope_level,
            iteration: idea.iteration,
            max_iterations: idea.max_iterations,
            pmf_market_size: scores.map(|s| s.market_size),
            pmf_problem_severity: scores.map(|s| s.problem_severity),
            pmf_solution_fit: scores.map(|s| s.solution_fit),
            pmf_competition: scores.map(|s| s.competition),
            pmf_vibe_codeable: scores.map(|s| s.vibe_codeable),
            pmf_virality: scores.map(|s| s.virality),
            chaos_level: idea.chaos_level,
            context: idea.context.clone(),
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}

impl IdeaRecord {
    /// Scores are only restored when every column is present
    fn pmf_scores(&self) -> Option<PmfScores> {
        Some(PmfScores {
            market_size: self.pmf_market_size?,
            problem_severity: self.pmf_problem_severity?,
            solution_fit: self.pmf_solution_fit?,
            competition: self.pmf_competition?,
            vibe_codeable: self.pmf_vibe_codeable?,
            virality: self.pmf_virality?,
        })
    }

    pub fn into_idea(self) -> Idea {
        let pmf_scores = self.pmf_scores();
        Idea {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            raw_idea: self.raw_idea,
            refined_idea: self.refined_idea,
            ralph_quote: self.ralph_quote,
            feedback: self.feedback,
            status: self.status,
            dope_level: self.dope_level,
            pmf_scores,
            iteration: self.iteration,
            max_iterations: self.max_iterations,
            chaos_level: self.chaos_level,
            context: self.context,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub id: String,
    pub idea_id: String,
    pub iteration_number: u32,
    pub idea_content: String,
    pub dope_level: DopeLevel,
    pub pmf_scores: Option<Value>,
    pub ralph_feedback: Option<String>,
    pub changes_made: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HasId for IterationRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl IterationRecord {
    fn from_iteration(iteration: &IdeaIteration) -> Result<Self> {
        let pmf_scores = iteration.pmf_scores.as_ref().map(serde_json::to_value).transpose()?;
        Ok(Self {
            id: iteration.id.clone(),
            idea_id: iteration.idea_id.clone(),
            iteration_number: iteration.iteration_number,
            idea_content: iteration.idea_content.clone(),
            dope_level: iteration.dope_level,
            pmf_scores,
            ralph_feedback: iteration.ralph_feedback.clone(),
            changes_made: iteration.changes_made.clone(),
            created_at: iteration.created_at,
        })
    }

    pub fn into_iteration(self) -> Result<IdeaIteration> {
        let pmf_scores = self.pmf_scores.map(serde_json::from_value).transpose()?;
        Ok(IdeaIteration {
            id: self.id,
            idea_id: self.idea_id,
            iteration_number: self.iteration_number,
            idea_content: self.idea_content,
            dope_level: self.dope_level,
            pmf_scores,
            ralph_feedback: self.ralph_feedback,
            changes_made: self.changes_made,
            created_at: self.created_at,
        })
    }
}

/// Ideas and their iteration history over any `Storage`
pub struct IdeaStore<S: Storage> {
    storage: S,
}

impl<S: Storage> IdeaStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Persist a finished loop. Saving the same idea again replaces its
    /// row and its whole iteration history.
    pub fn save_result(&self, result: &RalphLoopResult) -> Result<()> {
        let record = IdeaRecord::from(&result.idea);
        if self.storage.get::<IdeaRecord>(IDEAS, &record.id)?.is_some() {
            self.storage.update(IDEAS, &record)?;
        } else {
            self.storage.create(IDEAS, &record)?;
        }

        let replaced = self
            .storage
            .delete_where(ITERATIONS, &[Filter::eq("idea_id", &record.id)])?;
        if replaced > 0 {
            log::debug!("Replacing {} stored iterations for {}", replaced, record.id);
        }

        for iteration in &result.iterations {
            self.storage.create(ITERATIONS, &IterationRecord::from_iteration(iteration)?)?;
        }

        log::info!(
            "Saved idea {} with {} iterations",
            record.id,
            result.iterations.len()
        );
        Ok(())
    }

    pub fn get_idea(&self, id: &str) -> Result<Option<Idea>> {
        Ok(self.storage.get::<IdeaRecord>(IDEAS, id)?.map(IdeaRecord::into_idea))
    }

    /// All ideas, optionally restricted to one user, newest first
    pub fn list_ideas(&self, user_id: Option<&str>) -> Result<Vec<Idea>> {
        let filters: Vec<Filter> = user_id.map(|u| Filter::eq("user_id", u)).into_iter().collect();
        let mut ideas: Vec<Idea> = self
            .storage
            .query::<IdeaRecord>(IDEAS, &filters)?
            .into_iter()
            .map(IdeaRecord::into_idea)
            .collect();
        ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ideas)
    }

    /// Iteration history in pass order
    pub fn iterations_for(&self, idea_id: &str) -> Result<Vec<IdeaIteration>> {
        let mut iterations = self
            .storage
            .query::<IterationRecord>(ITERATIONS, &[Filter::eq("idea_id", idea_id)])?
            .into_iter()
            .map(IterationRecord::into_iteration)
            .collect::<Result<Vec<_>>>()?;
        iterations.sort_by_key(|i| i.iteration_number);
        Ok(iterations)
    }

    pub fn update_status(&self, id: &str, status: IdeaStatus) -> Result<Idea> {
        let mut idea = self
            .get_idea(id)?
            .ok_or_else(|| IdeaRalphError::NotFound(format!("idea {}", id)))?;
        idea.status = status;
        idea.touch();
        self.storage.update(IDEAS, &IdeaRecord::from(&idea))?;
        Ok(idea)
    }

    /// Remove an idea and every iteration that belongs to it
    pub fn delete_idea(&self, id: &str) -> Result<usize> {
        self.storage.delete(IDEAS, id)?;
        let removed = self
            .storage
            .delete_where(ITERATIONS, &[Filter::eq("idea_id", id)])?;
        log::info!("Deleted idea {} and {} iterations", id, removed);
        Ok(removed)
    }
}
