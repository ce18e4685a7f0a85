//! LLM Client Layer - Anthropic API integration and response extraction
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction, plus a scripted mock
//! - AnthropicClient implementation
//! - ModelGateway, the lazily-initialized entry point used by the engine
//! - Extraction of JSON records from free-form model output

pub mod anthropic;
pub mod client;
pub mod extract;
pub mod gateway;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, MockLlmClient};
pub use extract::{Validate, extract, extract_value};
pub use gateway::{GatewaySettings, ModelGateway, SendOptions};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, Usage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all public types are accessible
        let _role = Role::User;
        let _stop = StopReason::EndTurn;
        let _opts = SendOptions::default();
    }
}
