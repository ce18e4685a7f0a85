//! Prompt Builder - one method per mode, each returning text plus sampling
//!
//! Chaos maps linearly onto temperature (`base + chaos * slope`); clamping is
//! left to the gateway.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::render::PromptRenderer;
use super::templates;
use crate::domain::{Dimensions, DopeLevel, PmfScores, PmfScoresFull, field_label};
use crate::error::Result;
use crate::llm::SendOptions;

const GENERATE_BASE: f32 = 0.7;
const GENERATE_SLOPE: f32 = 0.03;
const REFINE_BASE: f32 = 0.6;
const REFINE_SLOPE: f32 = 0.02;
const EVALUATE_TEMPERATURE: f32 = 0.5;
const DOCUMENT_TEMPERATURE: f32 = 0.6;
const SCORE_TEMPERATURE: f32 = 0.5;
const SCORE_REFINE_TEMPERATURE: f32 = 0.7;

const GENERATE_TOKENS: u32 = 2048;
const REFINE_TOKENS: u32 = 2048;
const EVALUATE_TOKENS: u32 = 1024;
const SCORE_TOKENS: u32 = 1536;
const SCORE_REFINE_TOKENS: u32 = 2048;
const DOCUMENT_TOKENS: u32 = 4096;

/// Rendered instruction text and the sampling parameters to send it with
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Prompt {
    pub fn send_options(&self) -> SendOptions {
        SendOptions::new(self.max_tokens, self.temperature)
    }
}

/// How much document to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// One-page sketch ("napkin")
    #[default]
    #[serde(alias = "napkin")]
    Quick,
    /// Personas, user stories, technical notes ("science-fair")
    #[serde(alias = "science-fair")]
    Detailed,
    /// Investor-ready ("genius")
    #[serde(alias = "genius")]
    Comprehensive,
}

impl DetailLevel {
    /// Parse either the canonical name or its playful alias
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "quick" | "napkin" => Some(Self::Quick),
            "detailed" | "science-fair" => Some(Self::Detailed),
            "comprehensive" | "genius" => Some(Self::Comprehensive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Detailed => "detailed",
            Self::Comprehensive => "comprehensive",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Self::Quick => "napkin",
            Self::Detailed => "science-fair",
            Self::Comprehensive => "genius",
        }
    }

    /// Heading-friendly name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Quick => "Napkin",
            Self::Detailed => "Science Fair",
            Self::Comprehensive => "Genius",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Quick => "quick 1-page sketch: problem, solution, features, metrics",
            Self::Detailed => "detailed PRD with personas, user stories and technical considerations",
            Self::Comprehensive => "investor-ready document with TAM/SAM/SOM, business model and go-to-market",
        }
    }

    fn sections(&self) -> &'static str {
        match self {
            Self::Quick => templates::SECTIONS_QUICK,
            Self::Detailed => templates::SECTIONS_DETAILED,
            Self::Comprehensive => templates::SECTIONS_COMPREHENSIVE,
        }
    }
}

impl std::fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct ScoreLine {
    label: String,
    value: String,
}

fn score_lines<D: Dimensions>(scores: &D) -> Vec<ScoreLine> {
    scores
        .named()
        .into_iter()
        .map(|(field, value)| ScoreLine {
            label: field_label(field),
            value: value.to_string(),
        })
        .collect()
}

/// Renders every prompt the engine sends
pub struct PromptBuilder {
    renderer: PromptRenderer,
}

impl PromptBuilder {
    /// Build a renderer with all built-in templates registered
    pub fn new() -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        renderer.register_partial("persona", templates::PERSONA)?;
        renderer.register_partial("pmf_lite", templates::PMF_LITE_FORMAT)?;
        renderer.register_partial("pmf_full", templates::PMF_FULL_FORMAT)?;

        for (name, template) in [
            ("generate", templates::GENERATE),
            ("refine", templates::REFINE),
            ("evaluate", templates::EVALUATE),
            ("document", templates::DOCUMENT),
            ("score", templates::SCORE),
            ("score_refine", templates::SCORE_REFINE),
            ("prd", templates::PRD),
        ] {
            renderer.register_template(name, template)?;
        }

        Ok(Self { renderer })
    }

    /// Brand-new idea, optionally seeded by a topic
    pub fn generate(&self, chaos_level: u8, topic: Option<&str>) -> Result<Prompt> {
        let dope_scale: Vec<_> = DopeLevel::all()
            .map(|l| json!({ "level": l.value(), "description": l.description() }))
            .collect();
        let text = self.renderer.render_named(
            "generate",
            &json!({
                "chaos_level": chaos_level,
                "topic": topic.filter(|t| !t.trim().is_empty()),
                "dope_scale": dope_scale,
            }),
        )?;
        Ok(Prompt {
            text,
            temperature: GENERATE_BASE + chaos_level as f32 * GENERATE_SLOPE,
            max_tokens: GENERATE_TOKENS,
        })
    }

    /// One refinement pass over the current best text
    pub fn refine(
        &self,
        idea: &str,
        level: DopeLevel,
        iteration: u32,
        max_iterations: u32,
        feedback: Option<&str>,
        chaos_level: u8,
    ) -> Result<Prompt> {
        let text = self.renderer.render_named(
            "refine",
            &json!({
                "idea": idea,
                "dope_level": level.value(),
                "dope_description": level.description(),
                "iteration": iteration,
                "max_iterations": max_iterations,
                "feedback": feedback.filter(|f| !f.trim().is_empty()),
                "chaos_level": chaos_level,
                "gold_star": DopeLevel::GOLD_STAR.value(),
            }),
        )?;
        Ok(Prompt {
            text,
            temperature: REFINE_BASE + chaos_level as f32 * REFINE_SLOPE,
            max_tokens: REFINE_TOKENS,
        })
    }

    /// Score an idea without changing it
    pub fn evaluate(&self, idea: &str) -> Result<Prompt> {
        let text = self.renderer.render_named("evaluate", &json!({ "idea": idea }))?;
        Ok(Prompt {
            text,
            temperature: EVALUATE_TEMPERATURE,
            max_tokens: EVALUATE_TOKENS,
        })
    }

    /// Markdown requirements document for a six-dimension-scored idea
    pub fn document(&self, idea: &str, name: &str, scores: &PmfScores, detail: DetailLevel) -> Result<Prompt> {
        let text = self.renderer.render_named(
            "document",
            &json!({
                "idea": idea,
                "name": name,
                "scores": score_lines(scores),
                "detail": detail.alias(),
                "detail_summary": detail.summary(),
                "sections": detail.sections(),
            }),
        )?;
        Ok(Prompt {
            text,
            temperature: DOCUMENT_TEMPERATURE,
            max_tokens: DOCUMENT_TOKENS,
        })
    }

    /// Ten-dimension scoring plus an improved version of the idea
    pub fn score(&self, idea: &str) -> Result<Prompt> {
        let text = self.renderer.render_named("score", &json!({ "idea": idea }))?;
        Ok(Prompt {
            text,
            temperature: SCORE_TEMPERATURE,
            max_tokens: SCORE_TOKENS,
        })
    }

    /// Critique, improve and re-score in one round trip
    ///
    /// `target` is `None` when the caller wants the best possible score.
    pub fn score_refine(&self, idea: &str, iteration: u32, max_iterations: u32, target: Option<f64>) -> Result<Prompt> {
        let text = self.renderer.render_named(
            "score_refine",
            &json!({
                "idea": idea,
                "iteration": iteration,
                "max_iterations": max_iterations,
                "target": target.map(|t| t.to_string()),
            }),
        )?;
        Ok(Prompt {
            text,
            temperature: SCORE_REFINE_TEMPERATURE,
            max_tokens: SCORE_REFINE_TOKENS,
        })
    }

    /// Markdown requirements document for a ten-dimension-scored idea
    pub fn prd(&self, idea: &str, scores: &PmfScoresFull, detail: DetailLevel) -> Result<Prompt> {
        let text = self.renderer.render_named(
            "prd",
            &json!({
                "idea": idea,
                "scores": score_lines(scores),
                "average": format!("{:.2}", scores.aggregate()),
                "detail": detail.alias(),
                "detail_summary": detail.summary(),
                "sections": detail.sections(),
            }),
        )?;
        Ok(Prompt {
            text,
            temperature: DOCUMENT_TEMPERATURE,
            max_tokens: DOCUMENT_TOKENS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new().unwrap()
    }

    fn lite() -> PmfScores {
        PmfScores {
            market_size: 7.0,
            problem_severity: 8.0,
            solution_fit: 6.5,
            competition: 5.0,
            vibe_codeable: 9.0,
            virality: 4.0,
        }
    }

    #[test]
    fn test_every_prompt_has_persona() {
        let b = builder();
        let prompts = [
            b.generate(5, None).unwrap(),
            b.refine("idea", DopeLevel::new(2), 1, 3, None, 5).unwrap(),
            b.evaluate("idea").unwrap(),
            b.document("idea", "Name", &lite(), DetailLevel::Quick).unwrap(),
            b.score("idea").unwrap(),
            b.score_refine("idea", 1, 10, Some(9.5)).unwrap(),
            b.prd("idea", &PmfScoresFull::uniform(8.0), DetailLevel::Detailed).unwrap(),
        ];
        for prompt in prompts {
            assert!(prompt.text.starts_with("You are Ralph Wiggum"));
        }
    }

    #[test]
    fn test_generate_temperature_and_contract() {
        let prompt = builder().generate(10, Some("pet tech")).unwrap();
        assert!((prompt.temperature - 1.0).abs() < 1e-5);
        assert_eq!(prompt.max_tokens, 2048);
        assert!(prompt.text.contains("Your chaos level is 10/10"));
        assert!(prompt.text.contains("\"pet tech\""));
        for field in PmfScores::FIELDS {
            assert!(prompt.text.contains(&format!("\"{}\"", field)), "missing {field}");
        }
        assert!(prompt.text.contains("\"dopeLevel\": <0-5"));
        assert!(prompt.text.contains("4: Gold star material"));
        assert!(prompt.text.contains("5: SUPER NINTENDO DOPE"));
    }

    #[test]
    fn test_generate_without_topic() {
        let prompt = builder().generate(1, None).unwrap();
        assert!(prompt.text.contains("beautiful chaotic brain"));
        assert!((prompt.temperature - 0.73).abs() < 1e-5);

        let blank = builder().generate(1, Some("   ")).unwrap();
        assert!(blank.text.contains("beautiful chaotic brain"));
    }

    #[test]
    fn test_refine_contents() {
        let prompt = builder()
            .refine("Paste delivery", DopeLevel::new(2), 2, 3, Some("make it cheaper"), 5)
            .unwrap();
        assert!((prompt.temperature - 0.7).abs() < 1e-5);
        assert!(prompt.text.contains("iteration 2/3"));
        assert!(prompt.text.contains("Current dope level: 2/5 (My cat's breath level)"));
        assert!(prompt.text.contains("Paste delivery"));
        assert!(prompt.text.contains("HUMAN FEEDBACK: \"make it cheaper\""));
        assert!(prompt.text.contains("\"changesMade\""));
        assert!(prompt.text.contains("\"shouldContinue\""));
    }

    #[test]
    fn test_refine_omits_empty_feedback() {
        let prompt = builder().refine("x", DopeLevel::MIN, 1, 3, None, 5).unwrap();
        assert!(!prompt.text.contains("HUMAN FEEDBACK"));
    }

    #[test]
    fn test_evaluate_is_fixed_temperature() {
        let prompt = builder().evaluate("idea").unwrap();
        assert_eq!(prompt.temperature, 0.5);
        assert_eq!(prompt.max_tokens, 1024);
        assert!(prompt.text.contains("\"strengths\""));
    }

    #[test]
    fn test_document_sections_follow_detail() {
        let b = builder();
        let quick = b.document("idea", "Paste Pal", &lite(), DetailLevel::Quick).unwrap();
        let genius = b.document("idea", "Paste Pal", &lite(), DetailLevel::Comprehensive).unwrap();

        assert_eq!(quick.max_tokens, 4096);
        assert!(quick.text.contains("# Paste Pal - PRD"));
        assert!(quick.text.contains("- Market Size: 7/10"));
        assert!(quick.text.contains("- Solution Fit: 6.5/10"));
        assert!(!quick.text.contains("## Go-to-Market"));
        assert!(genius.text.contains("## Go-to-Market"));
        assert!(genius.text.contains("TAM / SAM / SOM"));
        assert_ne!(quick.text, genius.text);
    }

    #[test]
    fn test_score_contract_lists_all_ten_fields() {
        let prompt = builder().score("idea").unwrap();
        assert_eq!(prompt.max_tokens, 1536);
        for field in PmfScoresFull::FIELDS {
            assert!(prompt.text.contains(&format!("\"{}\": <0-10", field)), "missing {field}");
        }
        assert!(prompt.text.contains("\"improvedIdea\""));
    }

    #[test]
    fn test_score_refine_target_wording() {
        let b = builder();
        let target = b.score_refine("idea", 2, 5, Some(9.5)).unwrap();
        assert!(target.text.contains("iteration 2/5"));
        assert!(target.text.contains("9.5/10 or better"));

        let max = b.score_refine("idea", 1, 5, None).unwrap();
        assert!(max.text.contains("highest score you can reach"));
        assert_eq!(max.temperature, 0.7);
    }

    #[test]
    fn test_prd_includes_average() {
        let prompt = builder()
            .prd("idea", &PmfScoresFull::uniform(10.0), DetailLevel::Detailed)
            .unwrap();
        assert!(prompt.text.contains("average 10.00/10"));
        assert!(prompt.text.contains("- Ralph Factor: 10/10"));
        assert!(prompt.text.contains("## User Stories"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let b = builder();
        assert_eq!(b.generate(4, Some("x")).unwrap(), b.generate(4, Some("x")).unwrap());
    }

    #[test]
    fn test_detail_level_aliases() {
        assert_eq!(DetailLevel::parse("napkin"), Some(DetailLevel::Quick));
        assert_eq!(DetailLevel::parse("Science-Fair"), Some(DetailLevel::Detailed));
        assert_eq!(DetailLevel::parse("genius"), Some(DetailLevel::Comprehensive));
        assert_eq!(DetailLevel::parse("comprehensive"), Some(DetailLevel::Comprehensive));
        assert_eq!(DetailLevel::parse("epic"), None);

        let level: DetailLevel = serde_json::from_str("\"science-fair\"").unwrap();
        assert_eq!(level, DetailLevel::Detailed);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"detailed\"");
    }
}
