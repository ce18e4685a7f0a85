//! Tool routing and execution
//!
//! Defines the ToolRouter trait for dispatching tool calls by name and
//! LocalToolRouter, which runs them in-process against a RalphEngine.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::engine::RalphEngine;
use crate::error::{IdeaRalphError, Result};
use crate::llm::Validate;

use super::catalog::{ARCHITECTURE, BRAINSTORM, PRD, REFINE, ToolCatalog, VALIDATE};
use super::handlers::{self, ToolOutput};

/// Trait for routing and executing tool calls
#[async_trait]
pub trait ToolRouter: Send + Sync {
    /// Execute the named tool with JSON arguments
    async fn call(&self, name: &str, args: Value) -> Result<ToolOutput>;

    /// Get list of available tool names
    fn available_tools(&self) -> Vec<String>;
}

/// Decode and check tool arguments; nothing reaches the model on failure
fn parse_args<T: DeserializeOwned + Validate>(name: &str, args: Value) -> Result<T> {
    let args = if args.is_null() { Value::Object(Default::default()) } else { args };
    let input: T = serde_json::from_value(args)
        .map_err(|e| IdeaRalphError::Validation(format!("Invalid arguments for {}: {}", name, e)))?;
    input
        .validate()
        .map_err(|e| IdeaRalphError::Validation(format!("Invalid arguments for {}: {}", name, e)))?;
    Ok(input)
}

/// In-process tool router backed by the engine
pub struct LocalToolRouter {
    engine: Arc<RalphEngine>,
    catalog: ToolCatalog,
}

impl LocalToolRouter {
    /// Create a router exposing the built-in catalog
    pub fn new(engine: Arc<RalphEngine>) -> Self {
        Self {
            engine,
            catalog: ToolCatalog::builtin(),
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }
}

#[async_trait]
impl ToolRouter for LocalToolRouter {
    async fn call(&self, name: &str, args: Value) -> Result<ToolOutput> {
        if !self.catalog.contains(name) {
            return Err(IdeaRalphError::Validation(format!("Unknown tool: {}", name)));
        }

        tracing::info!(tool = name, "Tool call");

        match name {
            BRAINSTORM => handlers::brainstorm(&self.engine, &parse_args(name, args)?).await,
            VALIDATE => handlers::validate(&self.engine, &parse_args(name, args)?).await,
            REFINE => handlers::refine(self.engine.clone(), &parse_args(name, args)?).await,
            PRD => handlers::prd(&self.engine, &parse_args(name, args)?).await,
            ARCHITECTURE => Ok(handlers::architecture(&parse_args(name, args)?)),
            _ => Err(IdeaRalphError::Validation(format!("Tool '{}' has no handler", name))),
        }
    }

    fn available_tools(&self) -> Vec<String> {
        self.catalog.list().into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, ModelGateway};
    use serde_json::json;

    fn scores_json(score: f64) -> String {
        format!(
            r#"{{"problemClarity": {score}, "marketSize": {score}, "uniqueness": {score},
            "feasibility": {score}, "monetization": {score}, "timing": {score},
            "virality": {score}, "defensibility": {score}, "teamFit": {score},
            "ralphFactor": {score}}}"#
        )
    }

    fn router(texts: Vec<String>) -> (LocalToolRouter, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::with_texts(texts));
        let gateway = Arc::new(ModelGateway::with_client(mock.clone()));
        let engine = Arc::new(RalphEngine::new(gateway).unwrap());
        (LocalToolRouter::new(engine), mock)
    }

    #[test]
    fn test_available_tools() {
        let (router, _) = router(vec![]);
        assert_eq!(
            router.available_tools(),
            vec![BRAINSTORM, VALIDATE, REFINE, PRD, ARCHITECTURE]
        );
    }

    #[tokio::test]
    async fn test_validate_all_tens() {
        let reply = format!(r#"{{"scores": {}, "feedback": "Flawless."}}"#, scores_json(10.0));
        let (router, mock) = router(vec![reply]);

        let output = router.call(VALIDATE, json!({"idea": "Cat paste"})).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        assert!(output.text.contains("10.00"));
        assert!(output.text.contains("`idearalph_prd`"));
        assert_eq!(output.structured["average"], 10.0);
        assert_eq!(output.structured["idea"], "Cat paste");
    }

    #[tokio::test]
    async fn test_brainstorm_uses_improved_idea() {
        let reply = format!(
            r#"{{"scores": {}, "feedback": "Meh.", "improvedIdea": "Paste delivery drones"}}"#,
            scores_json(5.0)
        );
        let (router, _) = router(vec![reply]);

        let output = router.call(BRAINSTORM, json!({"topic": "paste"})).await.unwrap();
        assert_eq!(output.structured["idea"], "Paste delivery drones");
        assert!(output.text.contains("Consider refining it!"));
    }

    #[tokio::test]
    async fn test_unknown_tool_rejected() {
        let (router, mock) = router(vec![]);
        let err = router.call("idearalph_dance", json!({})).await.unwrap_err();
        assert!(matches!(err, IdeaRalphError::Validation(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_arguments_rejected_before_model_call() {
        let (router, mock) = router(vec![]);
        for (name, args) in [
            (VALIDATE, json!({})),
            (VALIDATE, json!({"idea": "   "})),
            (BRAINSTORM, json!({"topic": 42})),
            (REFINE, json!({"idea": "x", "mode": "forever"})),
            (REFINE, json!({"idea": "x", "maxIterations": 0})),
            (PRD, json!({"idea": "x", "level": "epic"})),
            (ARCHITECTURE, Value::Null),
        ] {
            let err = router.call(name, args).await.unwrap_err();
            assert!(matches!(err, IdeaRalphError::Validation(_)), "{name}");
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_refine_single_mode() {
        let reply = format!(
            r#"{{"improvedIdea": "Better paste", "scores": {}, "feedback": "Sharper. Keep going"}}"#,
            scores_json(8.0)
        );
        let (router, mock) = router(vec![reply]);

        let output = router
            .call(REFINE, json!({"idea": "paste", "mode": "single"}))
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        assert!(output.text.starts_with("# Ralph Loop Results"));
        assert!(output.text.contains("**Mode**: single | **Iterations**: 1 | **Final Score**: 8.00/10"));
        assert!(!output.text.contains("Iteration Journey"));
        assert_eq!(output.structured["final_idea"], "Better paste");
    }

    #[tokio::test]
    async fn test_prd_with_scores_skips_validation() {
        let (router, mock) = router(vec!["## Overview\nPaste.".to_string()]);
        let scores: Value = serde_json::from_str(&scores_json(7.0)).unwrap();

        let output = router
            .call(PRD, json!({"idea": "paste", "level": "science-fair", "scores": scores}))
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        assert!(output.text.starts_with("# PRD: Science Fair Level"));
        assert!(output.text.contains("## Overview"));
        assert!(output.text.contains("`idearalph_architecture`"));
        assert!(output.structured["architecture"].is_null());
    }

    #[tokio::test]
    async fn test_prd_without_scores_validates_first() {
        let score_reply = format!(r#"{{"scores": {}, "feedback": "ok"}}"#, scores_json(6.0));
        let (router, mock) = router(vec![score_reply, "PRD body".to_string()]);

        let output = router
            .call(PRD, json!({"idea": "paste", "includeArchitecture": true}))
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 2);
        assert!(output.text.contains("# Architecture & Implementation Plan"));
        assert_eq!(output.structured["average"], 6.0);
    }

    #[tokio::test]
    async fn test_architecture_makes_no_model_call() {
        let (router, mock) = router(vec![]);
        let output = router.call(ARCHITECTURE, json!({"idea": "paste"})).await.unwrap();
        assert_eq!(mock.call_count(), 0);
        assert!(output.text.contains("Phase 3"));
    }
}
