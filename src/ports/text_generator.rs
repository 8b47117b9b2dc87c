//! Text Generator Port - Interface for generative-text services.
//!
//! One call per lesson: the prompt goes out, raw text comes back. Parsing
//! and repair of that text happen in the domain, not in adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::lesson::LessonError;

/// Port for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends the prompt and returns the raw generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name and model, for logging and health output.
    fn provider_info(&self) -> ProviderInfo;
}

/// Identifies the provider behind a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Errors from text generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No credential configured for the provider.
    #[error("text generation is not configured: {0}")]
    NotConfigured(String),

    /// Provider answered with a non-success status.
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be read as the provider's envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider answered without any text.
    #[error("provider returned no content")]
    EmptyResponse,

    /// Provider blocked the prompt or the output.
    #[error("content filtered: {0}")]
    ContentFiltered(String),
}

impl GenerationError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        GenerationError::Status {
            status,
            message: message.into(),
        }
    }
}

impl From<GenerationError> for LessonError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NotConfigured(message) => LessonError::configuration(message),
            other => LessonError::generation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_maps_to_configuration_error() {
        let err: LessonError = GenerationError::NotConfigured("missing api key".into()).into();
        assert_eq!(err, LessonError::configuration("missing api key"));
    }

    #[test]
    fn upstream_failures_map_to_generation_error() {
        let err: LessonError = GenerationError::status(503, "overloaded").into();
        assert!(matches!(err, LessonError::Generation(ref m) if m.contains("503")));

        let err: LessonError = GenerationError::Timeout.into();
        assert_eq!(err.code(), "GENERATION_FAILED");
    }
}
