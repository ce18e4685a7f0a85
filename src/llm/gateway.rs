//! Model gateway: prompt text in, raw model text out
//!
//! The gateway owns at most one `LlmClient`. By default an `AnthropicClient`
//! is built on first use, reading the credential from the environment at
//! that moment, so constructing a gateway never fails. Tests inject a client
//! directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::error::{IdeaRalphError, Result};
use crate::llm::anthropic::{AnthropicClient, AnthropicConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::llm::client::LlmClient;
use crate::llm::types::CompletionRequest;

/// Default environment variable holding the API credential
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// How to build the default client
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub api_key_env: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(300),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Per-call sampling parameters
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system: Option<String>,
}

impl SendOptions {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
            system: None,
        }
    }
}

/// Lazily-initialized, shareable access point to the model
pub struct ModelGateway {
    settings: GatewaySettings,
    client: OnceCell<Arc<dyn LlmClient>>,
}

impl ModelGateway {
    /// Gateway that builds an Anthropic client on first `send`
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    /// Gateway backed by an already-constructed client
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            settings: GatewaySettings::default(),
            client: OnceCell::new_with(Some(client)),
        }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// True once a client exists
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&Arc<dyn LlmClient>> {
        self.client
            .get_or_try_init(|| async {
                let api_key = std::env::var(&self.settings.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        IdeaRalphError::Configuration(format!("{} is not configured", self.settings.api_key_env))
                    })?;

                let config = AnthropicConfig {
                    model: self.settings.model.clone(),
                    max_tokens: self.settings.max_tokens,
                    timeout: self.settings.timeout,
                    ..Default::default()
                };
                log::debug!("Creating Anthropic client for model {}", config.model);
                let client = AnthropicClient::with_api_key(api_key, config)?;
                Ok::<Arc<dyn LlmClient>, IdeaRalphError>(Arc::new(client))
            })
            .await
    }

    /// Send one prompt and return the model's text
    pub async fn send(&self, prompt: &str, options: &SendOptions) -> Result<String> {
        let client = self.client().await?;

        let mut request = CompletionRequest::new(options.system.clone().unwrap_or_default())
            .with_user_message(prompt)
            .with_max_tokens(options.max_tokens.unwrap_or(self.settings.max_tokens));
        if let Some(t) = options.temperature {
            request = request.with_temperature(clamp_temperature(t));
        }

        log::debug!(
            "Sending prompt ({} chars, max_tokens={:?}, temperature={:?})",
            prompt.len(),
            request.max_tokens,
            request.temperature
        );

        let response = client.complete(request).await?;
        if response.stop_reason.is_truncated() {
            log::warn!("Model output hit max_tokens; JSON may be incomplete");
        }
        if response.content.trim().is_empty() {
            return Err(IdeaRalphError::Upstream("no text content in model response".to_string()));
        }
        Ok(response.content)
    }
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("settings", &self.settings)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Keep temperature inside the API's accepted range
pub fn clamp_temperature(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}
