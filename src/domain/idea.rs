//! Idea (the candidate under refinement) and its dope level
//!
//! An `Idea` is created when a loop starts and mutated in place by each
//! refinement pass. Deletion is a store concern, never the loop's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::scores::PmfScores;
use crate::id::generate_idea_id;

/// Discrete 0-5 quality tier the model reports for an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DopeLevel(u8);

impl DopeLevel {
    pub const MIN: DopeLevel = DopeLevel(0);
    pub const MAX: DopeLevel = DopeLevel(5);

    /// "Gold star material": the level refinement aims for
    pub const GOLD_STAR: DopeLevel = DopeLevel(4);

    /// Build from an in-range integer, clamping anything above `MAX`
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    /// Clamp whatever the model reported into the valid range
    ///
    /// Fractions are truncated, so a reported 3.9 is still below gold star.
    pub fn from_reported(level: f64) -> Self {
        if !level.is_finite() {
            return Self::MIN;
        }
        Self(level.floor().clamp(Self::MIN.0 as f64, Self::MAX.0 as f64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Human description of the tier
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "Ralph ate the idea",
            1 => "Tastes like burning",
            2 => "My cat's breath level",
            3 => "Paste-worthy",
            4 => "Gold star material",
            _ => "SUPER NINTENDO DOPE",
        }
    }

    /// Every tier from lowest to highest
    pub fn all() -> impl Iterator<Item = DopeLevel> {
        (Self::MIN.0..=Self::MAX.0).map(DopeLevel)
    }
}

/// Serde helper: accept any number the model reports and clamp it
pub fn deserialize_reported<'de, D>(deserializer: D) -> Result<DopeLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(DopeLevel::from_reported(raw))
}

impl std::fmt::Display for DopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    /// Not (yet) good enough; the default resting state
    #[default]
    Sandbox,
    /// Being scored
    Validating,
    /// Inside a refinement pass
    Refining,
    /// Reached the dope threshold
    Completed,
    /// Put away by the owner
    Archived,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Sandbox => "sandbox",
            IdeaStatus::Validating => "validating",
            IdeaStatus::Refining => "refining",
            IdeaStatus::Completed => "completed",
            IdeaStatus::Archived => "archived",
        }
    }

    /// Parse from the lowercase wire form
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sandbox" => Some(Self::Sandbox),
            "validating" => Some(Self::Validating),
            "refining" => Some(Self::Refining),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One working version of a generated startup idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    //=== Identity ===
    pub id: String,

    /// Owner reference, when the caller has one
    pub user_id: Option<String>,

    //=== Content ===
    pub name: String,

    /// Text produced by the first generation pass
    pub raw_idea: String,

    /// Text produced by the latest refinement pass
    pub refined_idea: Option<String>,

    pub ralph_quote: Option<String>,

    pub feedback: Option<String>,

    //=== Assessment ===
    pub status: IdeaStatus,

    pub dope_level: DopeLevel,

    pub pmf_scores: Option<PmfScores>,

    //=== Loop state ===
    pub iteration: u32,

    pub max_iterations: u32,

    /// 1-10 knob mapped to sampling temperature
    pub chaos_level: u8,

    /// Free-form caller context
    pub context: serde_json::Value,

    //=== Timestamps ===
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Create a fresh idea in the sandbox
    pub fn new(name: impl Into<String>, raw_idea: impl Into<String>, max_iterations: u32, chaos_level: u8) -> Self {
        let now = Utc::now();
        Self {
            id: generate_idea_id(),
            user_id: None,
            name: name.into(),
            raw_idea: raw_idea.into(),
            refined_idea: None,
            ralph_quote: None,
            feedback: None,
            status: IdeaStatus::Sandbox,
            dope_level: DopeLevel::MIN,
            pmf_scores: None,
            iteration: 0,
            max_iterations,
            chaos_level,
            context: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refined text if there is one, otherwise the raw text
    pub fn current_text(&self) -> &str {
        self.refined_idea.as_deref().unwrap_or(&self.raw_idea)
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dope_level_clamps_reported_values() {
        assert_eq!(DopeLevel::from_reported(-3.0), DopeLevel::MIN);
        assert_eq!(DopeLevel::from_reported(9.0), DopeLevel::MAX);
        assert_eq!(DopeLevel::from_reported(3.4).value(), 3);
        assert_eq!(DopeLevel::from_reported(3.6).value(), 3);
        assert_eq!(DopeLevel::from_reported(3.99).value(), 3);
        assert_eq!(DopeLevel::from_reported(4.0), DopeLevel::GOLD_STAR);
        assert_eq!(DopeLevel::from_reported(4.5).value(), 4);
        assert_eq!(DopeLevel::from_reported(f64::NAN), DopeLevel::MIN);
        assert_eq!(DopeLevel::new(42), DopeLevel::MAX);
    }

    #[test]
    fn test_dope_level_descriptions() {
        assert_eq!(DopeLevel::new(0).description(), "Ralph ate the idea");
        assert_eq!(DopeLevel::GOLD_STAR.description(), "Gold star material");
        assert_eq!(DopeLevel::MAX.description(), "SUPER NINTENDO DOPE");
        assert_eq!(DopeLevel::all().count(), 6);
    }

    #[test]
    fn test_dope_level_serializes_as_number() {
        assert_eq!(serde_json::to_string(&DopeLevel::new(3)).unwrap(), "3");
        let level: DopeLevel = serde_json::from_str("4").unwrap();
        assert_eq!(level, DopeLevel::GOLD_STAR);
    }

    #[test]
    fn test_deserialize_reported_clamps() {
        #[derive(Deserialize)]
        struct Reported {
            #[serde(deserialize_with = "deserialize_reported")]
            level: DopeLevel,
        }
        let high: Reported = serde_json::from_str(r#"{"level": 7.5}"#).unwrap();
        assert_eq!(high.level, DopeLevel::MAX);
        let low: Reported = serde_json::from_str(r#"{"level": -1}"#).unwrap();
        assert_eq!(low.level, DopeLevel::MIN);
        assert!(serde_json::from_str::<Reported>(r#"{"level": "high"}"#).is_err());
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            IdeaStatus::Sandbox,
            IdeaStatus::Validating,
            IdeaStatus::Refining,
            IdeaStatus::Completed,
            IdeaStatus::Archived,
        ] {
            assert_eq!(IdeaStatus::parse(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(IdeaStatus::parse("bogus"), None);
    }

    #[test]
    fn test_new_idea_defaults() {
        let idea = Idea::new("Paste Pal", "An app for paste", 3, 5);
        assert_eq!(idea.status, IdeaStatus::Sandbox);
        assert_eq!(idea.iteration, 0);
        assert_eq!(idea.max_iterations, 3);
        assert_eq!(idea.chaos_level, 5);
        assert!(idea.refined_idea.is_none());
    }

    #[test]
    fn test_current_text_prefers_refined() {
        let mut idea = Idea::new("Paste Pal", "raw", 3, 5);
        assert_eq!(idea.current_text(), "raw");
        idea.refined_idea = Some("refined".to_string());
        assert_eq!(idea.current_text(), "refined");
    }
}
