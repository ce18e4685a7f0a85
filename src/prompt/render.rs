//! Prompt Renderer - Render templates with context variables using Handlebars
//!
//! Output is plain text for a model, so HTML escaping is disabled and
//! missing variables render as empty strings.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{IdeaRalphError, Result};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a new PromptRenderer with default settings
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Register escape fn to prevent HTML escaping
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Register a named template for later use
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| IdeaRalphError::Template(format!("Failed to register template '{}': {}", name, e)))
    }

    /// Register a partial usable as `{{> name}}` from any template
    pub fn register_partial(&mut self, name: &str, partial: &str) -> Result<()> {
        self.handlebars
            .register_partial(name, partial)
            .map_err(|e| IdeaRalphError::Template(format!("Failed to register partial '{}': {}", name, e)))
    }

    /// Render a previously registered template
    pub fn render_named<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| IdeaRalphError::Template(format!("Failed to render template '{}': {}", name, e)))
    }

    /// Render an ad-hoc template string
    #[cfg(test)]
    fn render_template<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| IdeaRalphError::Template(format!("Failed to render template: {}", e)))
    }

    /// Check if a named template is registered
    #[cfg(test)]
    fn has_template(&self, name: &str) -> bool {
        self.handlebars.get_template(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_simple() {
        let renderer = PromptRenderer::new();
        let result = renderer.render_template("Hello, {{name}}!", &json!({"name": "Ralph"})).unwrap();
        assert_eq!(result, "Hello, Ralph!");
    }

    #[test]
    fn test_render_missing_variable_empty_string() {
        let renderer = PromptRenderer::new();
        let result = renderer.render_template("Hello, {{name}}!", &json!({})).unwrap();
        assert_eq!(result, "Hello, !");
    }

    #[test]
    fn test_render_no_escape_html() {
        let renderer = PromptRenderer::new();
        let result = renderer
            .render_template("Score: {{score}}", &json!({"score": "<0-10> & \"quoted\""}))
            .unwrap();
        assert_eq!(result, "Score: <0-10> & \"quoted\"");
    }

    #[test]
    fn test_named_template_with_partial() {
        let mut renderer = PromptRenderer::new();
        renderer.register_partial("greeting", "I'm {{who}}.").unwrap();
        renderer.register_template("intro", "{{> greeting}} Hi!").unwrap();

        assert!(renderer.has_template("intro"));
        assert!(!renderer.has_template("nonexistent"));

        let result = renderer.render_named("intro", &json!({"who": "Ralph"})).unwrap();
        assert_eq!(result, "I'm Ralph. Hi!");
    }

    #[test]
    fn test_render_unknown_template_is_error() {
        let renderer = PromptRenderer::new();
        let err = renderer.render_named("missing", &json!({})).unwrap_err();
        assert!(matches!(err, IdeaRalphError::Template(_)));
    }

    #[test]
    fn test_register_invalid_template_is_error() {
        let mut renderer = PromptRenderer::new();
        let err = renderer.register_template("bad", "{{#if x}}unclosed").unwrap_err();
        assert!(matches!(err, IdeaRalphError::Template(_)));
    }
}
