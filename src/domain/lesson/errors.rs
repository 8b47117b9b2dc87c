//! Lesson pipeline error types.

use thiserror::Error;

/// Failures that abort a lesson deck request.
///
/// Image failures are deliberately absent: a missing image is a valid outcome
/// and never surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LessonError {
    /// Bad or missing input from the caller.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Missing credential or endpoint on the server side.
    #[error("Server is not configured: {0}")]
    Configuration(String),

    /// Text generation service returned an error, timed out or was unreachable.
    #[error("Content generation failed: {0}")]
    Generation(String),

    /// Text generation output was not valid JSON.
    #[error("Could not parse generated content: {0}")]
    Parse(String),

    /// Parsed JSON did not have the lesson shape.
    #[error("Generated content has an invalid structure: {0}")]
    Schema(String),

    /// Deck could not be written.
    #[error("Could not serialize presentation: {0}")]
    Serialization(String),
}

impl LessonError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LessonError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        LessonError::Configuration(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        LessonError::Generation(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        LessonError::Parse(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        LessonError::Schema(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        LessonError::Serialization(message.into())
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            LessonError::Validation { .. } => "VALIDATION_FAILED",
            LessonError::Configuration(_) => "CONFIGURATION_ERROR",
            LessonError::Generation(_) => "GENERATION_FAILED",
            LessonError::Parse(_) => "PARSE_ERROR",
            LessonError::Schema(_) => "SCHEMA_ERROR",
            LessonError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns true when the caller, not the server, caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LessonError::Validation { .. })
    }
}
