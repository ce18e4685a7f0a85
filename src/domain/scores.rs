//! Scored dimensions
//!
//! Two fixed PMF (product-market fit) schemas share one trait so that range
//! validation and aggregation are written once. The six-field set drives the
//! Ralph Loop; the ten-field set drives the tool surface.

use serde::{Deserialize, Serialize};

use crate::llm::extract::Validate;

/// Lowest allowed value for any dimension
pub const MIN_SCORE: f64 = 0.0;

/// Highest allowed value for any dimension
pub const MAX_SCORE: f64 = 10.0;

/// A fixed record of named numeric fields, each in `[0, 10]`
pub trait Dimensions {
    /// Field names in declaration order, spelled as the model emits them
    const FIELDS: &'static [&'static str];

    /// Field values in the same order as `FIELDS`
    fn values(&self) -> Vec<f64>;

    /// Arithmetic mean of all fields
    fn aggregate(&self) -> f64 {
        let values = self.values();
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// `(field name, value)` pairs in declaration order
    fn named(&self) -> Vec<(&'static str, f64)> {
        Self::FIELDS.iter().copied().zip(self.values()).collect()
    }

    /// First field that is non-finite or outside `[0, 10]`
    fn out_of_range(&self) -> Option<(&'static str, f64)> {
        self.named()
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < MIN_SCORE || *v > MAX_SCORE)
    }
}

/// Display label for a camelCase field name: `marketSize` -> `Market Size`
pub fn field_label(field: &str) -> String {
    let mut label = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

fn check_ranges<D: Dimensions>(scores: &D) -> Result<(), String> {
    match scores.out_of_range() {
        Some((field, value)) => Err(format!(
            "score '{}' = {} is outside [{}, {}]",
            field, value, MIN_SCORE, MAX_SCORE
        )),
        None => Ok(()),
    }
}

/// Six-dimension "PMF-lite" scores used by the Ralph Loop
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmfScores {
    /// How big is the potential market?
    pub market_size: f64,
    /// How painful is the problem?
    pub problem_severity: f64,
    /// How well does the idea solve it?
    pub solution_fit: f64,
    /// How crowded is the space? (10 = low competition)
    pub competition: f64,
    /// Can a vibe coder build this?
    pub vibe_codeable: f64,
    /// Will people share this?
    pub virality: f64,
}

impl Dimensions for PmfScores {
    const FIELDS: &'static [&'static str] = &[
        "marketSize",
        "problemSeverity",
        "solutionFit",
        "competition",
        "vibeCodeable",
        "virality",
    ];

    fn values(&self) -> Vec<f64> {
        vec![
            self.market_size,
            self.problem_severity,
            self.solution_fit,
            self.competition,
            self.vibe_codeable,
            self.virality,
        ]
    }
}

impl Validate for PmfScores {
    fn validate(&self) -> Result<(), String> {
        check_ranges(self)
    }
}

/// Ten-dimension scores used by the validate / refine / PRD tools
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmfScoresFull {
    pub problem_clarity: f64,
    pub market_size: f64,
    pub uniqueness: f64,
    pub feasibility: f64,
    pub monetization: f64,
    pub timing: f64,
    pub virality: f64,
    pub defensibility: f64,
    pub team_fit: f64,
    pub ralph_factor: f64,
}

impl PmfScoresFull {
    /// Every dimension set to `value`
    pub fn uniform(value: f64) -> Self {
        Self {
            problem_clarity: value,
            market_size: value,
            uniqueness: value,
            feasibility: value,
            monetization: value,
            timing: value,
            virality: value,
            defensibility: value,
            team_fit: value,
            ralph_factor: value,
        }
    }
}

impl Dimensions for PmfScoresFull {
    const FIELDS: &'static [&'static str] = &[
        "problemClarity",
        "marketSize",
        "uniqueness",
        "feasibility",
        "monetization",
        "timing",
        "virality",
        "defensibility",
        "teamFit",
        "ralphFactor",
    ];

    fn values(&self) -> Vec<f64> {
        vec![
            self.problem_clarity,
            self.market_size,
            self.uniqueness,
            self.feasibility,
            self.monetization,
            self.timing,
            self.virality,
            self.defensibility,
            self.team_fit,
            self.ralph_factor,
        ]
    }
}

impl Validate for PmfScoresFull {
    fn validate(&self) -> Result<(), String> {
        check_ranges(self)
    }
}
