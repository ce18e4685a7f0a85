//! RalphEngine - single-shot model operations
//!
//! Each operation is one prompt, one gateway call and, for JSON modes, one
//! extraction. The loop runners and the tool surface are built on these.

mod responses;

use std::sync::Arc;

use crate::domain::{DopeLevel, PmfScores, PmfScoresFull};
use crate::error::Result;
use crate::llm::{ModelGateway, extract};
use crate::prompt::{DetailLevel, Prompt, PromptBuilder};
use crate::scoring::should_continue;

pub use responses::{Evaluation, IdeaDraft, ScoreRefinement, ScoreReport};

/// Change description recorded when the model does not supply one
pub const DEFAULT_CHANGES: &str = "Various improvements";

pub struct RalphEngine {
    gateway: Arc<ModelGateway>,
    prompts: PromptBuilder,
}

impl RalphEngine {
    pub fn new(gateway: Arc<ModelGateway>) -> Result<Self> {
        Ok(Self {
            gateway,
            prompts: PromptBuilder::new()?,
        })
    }

    async fn send(&self, prompt: &Prompt) -> Result<String> {
        self.gateway.send(&prompt.text, &prompt.send_options()).await
    }

    /// Brand-new idea
    ///
    /// `should_continue` is set to whether the idea is still below gold star.
    pub async fn generate_idea(&self, chaos_level: u8, topic: Option<&str>) -> Result<IdeaDraft> {
        let prompt = self.prompts.generate(chaos_level, topic)?;
        let raw = self.send(&prompt).await?;
        let mut draft: IdeaDraft = extract(&raw)?;

        draft.changes_made = None;
        draft.should_continue = Some(draft.dope_level < DopeLevel::GOLD_STAR);
        log::debug!("Generated '{}' at dope level {}", draft.name, draft.dope_level);
        Ok(draft)
    }

    /// One refinement pass
    ///
    /// `should_continue` on the result is the model's suggestion: its own
    /// level judged against gold star with the post-step counter, AND-ed with
    /// any explicit `shouldContinue` it reported.
    pub async fn refine_idea(
        &self,
        idea: &str,
        level: DopeLevel,
        iteration: u32,
        max_iterations: u32,
        feedback: Option<&str>,
        chaos_level: u8,
    ) -> Result<IdeaDraft> {
        let prompt = self
            .prompts
            .refine(idea, level, iteration, max_iterations, feedback, chaos_level)?;
        let raw = self.send(&prompt).await?;
        let mut draft: IdeaDraft = extract(&raw)?;

        let by_level = should_continue(
            draft.dope_level.as_f64(),
            iteration + 1,
            max_iterations,
            DopeLevel::GOLD_STAR.as_f64(),
        );
        draft.should_continue = Some(by_level && draft.should_continue.unwrap_or(true));

        if draft.changes_made.as_deref().is_none_or(|c| c.trim().is_empty()) {
            draft.changes_made = Some(DEFAULT_CHANGES.to_string());
        }

        log::debug!(
            "Refined '{}' to dope level {} (iteration {}/{})",
            draft.name,
            draft.dope_level,
            iteration,
            max_iterations
        );
        Ok(draft)
    }

    /// Score without modifying
    pub async fn evaluate_idea(&self, idea: &str) -> Result<Evaluation> {
        let prompt = self.prompts.evaluate(idea)?;
        let raw = self.send(&prompt).await?;
        extract(&raw)
    }

    /// Markdown requirements document from six-dimension scores
    pub async fn generate_document(
        &self,
        idea: &str,
        name: &str,
        scores: &PmfScores,
        detail: DetailLevel,
    ) -> Result<String> {
        let prompt = self.prompts.document(idea, name, scores, detail)?;
        let raw = self.send(&prompt).await?;
        Ok(raw.trim().to_string())
    }

    /// Ten-dimension score and a suggested improvement
    pub async fn score_idea(&self, idea: &str) -> Result<ScoreReport> {
        let prompt = self.prompts.score(idea)?;
        let raw = self.send(&prompt).await?;
        extract(&raw)
    }

    /// Critique, improve and re-score in one round trip
    pub async fn score_refine(
        &self,
        idea: &str,
        iteration: u32,
        max_iterations: u32,
        target: Option<f64>,
    ) -> Result<ScoreRefinement> {
        let prompt = self.prompts.score_refine(idea, iteration, max_iterations, target)?;
        let raw = self.send(&prompt).await?;
        extract(&raw)
    }

    /// Markdown requirements document from ten-dimension scores
    pub async fn generate_prd(&self, idea: &str, scores: &PmfScoresFull, detail: DetailLevel) -> Result<String> {
        let prompt = self.prompts.prd(idea, scores, detail)?;
        let raw = self.send(&prompt).await?;
        Ok(raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdeaRalphError;
    use crate::llm::MockLlmClient;

    fn draft_json(level: f64, extra: &str) -> String {
        format!(
            r#"{{"name": "Paste Pal", "idea": "Paste, delivered.", "ralphQuote": "Yum",
            "pmfScores": {{"marketSize": 5, "problemSeverity": 5, "solutionFit": 5,
                          "competition": 5, "vibeCodeable": 5, "virality": 5}},
            "dopeLevel": {level}, "feedback": "ok"{extra}}}"#
        )
    }

    fn engine(texts: Vec<String>) -> (RalphEngine, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::with_texts(texts));
        let gateway = Arc::new(ModelGateway::with_client(mock.clone()));
        (RalphEngine::new(gateway).unwrap(), mock)
    }

    #[tokio::test]
    async fn test_generate_sets_continuation_from_level() {
        let (engine, mock) = engine(vec![draft_json(2.0, ""), draft_json(4.0, "")]);

        let low = engine.generate_idea(5, Some("paste")).await.unwrap();
        assert_eq!(low.should_continue, Some(true));
        let high = engine.generate_idea(5, None).await.unwrap();
        assert_eq!(high.should_continue, Some(false));

        let requests = mock.requests();
        assert!((requests[0].temperature.unwrap() - 0.85).abs() < 1e-5);
        assert_eq!(requests[0].max_tokens, Some(2048));
    }

    #[tokio::test]
    async fn test_refine_defaults_changes() {
        let (engine, _) = engine(vec![draft_json(3.0, "")]);
        let draft = engine
            .refine_idea("idea", DopeLevel::new(2), 1, 3, None, 5)
            .await
            .unwrap();
        assert_eq!(draft.changes_made.as_deref(), Some(DEFAULT_CHANGES));
        assert_eq!(draft.should_continue, Some(true));
    }

    #[tokio::test]
    async fn test_refine_continuation_uses_post_step_counter() {
        // level 2 < 4, but iteration 2 + 1 >= 3
        let (engine, _) = engine(vec![draft_json(2.0, "")]);
        let draft = engine
            .refine_idea("idea", DopeLevel::new(1), 2, 3, None, 5)
            .await
            .unwrap();
        assert_eq!(draft.should_continue, Some(false));
    }

    #[tokio::test]
    async fn test_refine_fractional_level_below_gold_star_continues() {
        let (engine, _) = engine(vec![draft_json(3.9, "")]);
        let draft = engine
            .refine_idea("idea", DopeLevel::new(3), 1, 5, None, 5)
            .await
            .unwrap();
        assert_eq!(draft.dope_level.value(), 3);
        assert_eq!(draft.should_continue, Some(true));
    }

    #[tokio::test]
    async fn test_refine_model_can_stop_but_not_extend() {
        let (engine, _) = engine(vec![
            draft_json(2.0, r#", "shouldContinue": false"#),
            draft_json(4.0, r#", "shouldContinue": true, "changesMade": "sharper pitch""#),
        ]);

        let stopped = engine.refine_idea("idea", DopeLevel::new(1), 1, 5, None, 5).await.unwrap();
        assert_eq!(stopped.should_continue, Some(false));

        let done = engine.refine_idea("idea", DopeLevel::new(2), 1, 5, None, 5).await.unwrap();
        assert_eq!(done.should_continue, Some(false));
        assert_eq!(done.changes_made.as_deref(), Some("sharper pitch"));
    }

    #[tokio::test]
    async fn test_evaluate() {
        let raw = r#"{"pmfScores": {"marketSize": 8, "problemSeverity": 7, "solutionFit": 6,
            "competition": 5, "vibeCodeable": 4, "virality": 3},
            "dopeLevel": 3, "feedback": "meh", "strengths": ["cheap"], "weaknesses": []}"#;
        let (engine, mock) = engine(vec![raw.to_string()]);
        let eval = engine.evaluate_idea("idea").await.unwrap();
        assert_eq!(eval.dope_level.value(), 3);
        assert_eq!(eval.strengths, vec!["cheap".to_string()]);
        assert_eq!(mock.requests()[0].temperature, Some(0.5));
    }

    #[tokio::test]
    async fn test_document_returns_trimmed_markdown() {
        let (engine, mock) = engine(vec!["\n# Paste Pal - PRD\n\nBody\n".to_string()]);
        let doc = engine
            .generate_document("idea", "Paste Pal", &PmfScores::default(), DetailLevel::Quick)
            .await
            .unwrap();
        assert_eq!(doc, "# Paste Pal - PRD\n\nBody");
        assert_eq!(mock.requests()[0].max_tokens, Some(4096));
    }

    #[tokio::test]
    async fn test_extraction_failure_propagates() {
        let (engine, _) = engine(vec!["I ate the JSON".to_string()]);
        let err = engine.generate_idea(5, None).await.unwrap_err();
        assert!(matches!(err, IdeaRalphError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_score_refine_parses() {
        let raw = r#"{"improvedIdea": "Paste, but social", "scores": {"problemClarity": 8,
            "marketSize": 8, "uniqueness": 8, "feasibility": 8, "monetization": 8, "timing": 8,
            "virality": 8, "defensibility": 8, "teamFit": 8, "ralphFactor": 8},
            "feedback": "better", "shouldContinue": true}"#;
        let (engine, mock) = engine(vec![raw.to_string()]);
        let round = engine.score_refine("Paste", 1, 10, Some(9.5)).await.unwrap();
        assert_eq!(round.improved_idea, "Paste, but social");
        assert_eq!(round.should_continue, Some(true));
        assert_eq!(mock.requests()[0].max_tokens, Some(2048));
    }
}
