//! Deck Serializer Port - Writes a deck model to a file format.

use thiserror::Error;

use crate::domain::deck::DeckDocument;
use crate::domain::lesson::LessonError;

/// Port for deck serialization.
pub trait DeckSerializer: Send + Sync {
    /// Serializes the deck into file bytes.
    fn serialize(&self, deck: &DeckDocument) -> Result<Vec<u8>, SerializeError>;

    /// MIME type of the produced file.
    fn mime_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;
}

/// Errors from deck serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("xml generation failed: {0}")]
    Xml(String),

    #[error("archive write failed: {0}")]
    Archive(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for SerializeError {
    fn from(err: std::fmt::Error) -> Self {
        SerializeError::Xml(err.to_string())
    }
}

impl From<SerializeError> for LessonError {
    fn from(err: SerializeError) -> Self {
        LessonError::serialization(err.to_string())
    }
}
