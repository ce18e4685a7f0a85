//! Error types for idearalph
//!
//! Centralized error handling using thiserror. Every variant aborts the
//! operation that raised it; nothing here is retried by the library.

use thiserror::Error;

/// Maximum number of characters of offending model output kept for diagnostics
pub const EXCERPT_LEN: usize = 200;

/// All error types that can occur in idearalph
#[derive(Debug, Error)]
pub enum IdeaRalphError {
    /// Required configuration (usually the API credential) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model call failed: transport, auth, rate limit or empty response
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Model output could not be turned into the expected record
    #[error("Extraction error: {message} (response started with: {excerpt:?})")]
    Extraction { message: String, excerpt: String },

    /// Caller-supplied input failed schema constraints
    #[error("Validation error: {0}")]
    Validation(String),

    /// Prompt template failed to render
    #[error("Template error: {0}")]
    Template(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Record not found in storage
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdeaRalphError {
    /// Build an extraction error, keeping only the head of the offending text
    pub fn extraction(message: impl Into<String>, raw: &str) -> Self {
        Self::Extraction {
            message: message.into(),
            excerpt: excerpt(raw),
        }
    }

    /// True for errors raised before any model call was made
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Configuration(_))
    }
}

/// First `EXCERPT_LEN` characters of `text`, char-boundary safe
pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LEN).collect()
}

/// Result type alias for idearalph operations
pub type Result<T> = std::result::Result<T, IdeaRalphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = IdeaRalphError::Configuration("ANTHROPIC_API_KEY is not configured".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: ANTHROPIC_API_KEY is not configured"
        );
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_upstream_error() {
        let err = IdeaRalphError::Upstream("rate limited".to_string());
        assert_eq!(err.to_string(), "Upstream error: rate limited");
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_validation_error() {
        let err = IdeaRalphError::Validation("chaosLevel must be between 1 and 10".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: chaosLevel must be between 1 and 10"
        );
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_extraction_truncates_excerpt() {
        let raw = "x".repeat(500);
        let err = IdeaRalphError::extraction("no JSON object found", &raw);
        match err {
            IdeaRalphError::Extraction { message, excerpt } => {
                assert_eq!(message, "no JSON object found");
                assert_eq!(excerpt.len(), EXCERPT_LEN);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let raw = "é".repeat(300);
        let head = excerpt(&raw);
        assert_eq!(head.chars().count(), EXCERPT_LEN);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IdeaRalphError = io_err.into();
        assert!(matches!(err, IdeaRalphError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: IdeaRalphError = json_err.into();
        assert!(matches!(err, IdeaRalphError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(IdeaRalphError::NotFound("idea".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
