//! Response packager - serializes a deck and wraps it for transport.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::domain::deck::DeckDocument;
use crate::domain::lesson::LessonError;
use crate::ports::DeckSerializer;

const MAX_FILE_STEM_CHARS: usize = 60;

/// Summary of a generated deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPreview {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Content slides, excluding the title slide.
    pub slide_count: usize,
    /// Images embedded in the deck.
    pub images_generated: usize,
}

/// A serialized deck ready to return to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckPackage {
    pub file_name: String,
    /// Base64 of the file bytes.
    pub file_data: String,
    pub mime_type: String,
    pub preview: DeckPreview,
}

/// Serializes `deck` and base64-encodes the result.
///
/// # Errors
///
/// Returns `LessonError::Serialization` if the serializer fails.
pub fn package(
    serializer: &dyn DeckSerializer,
    deck: &DeckDocument,
    topic: &str,
) -> Result<DeckPackage, LessonError> {
    let bytes = serializer.serialize(deck)?;

    Ok(DeckPackage {
        file_name: format!("{}.{}", file_stem(topic), serializer.extension()),
        file_data: STANDARD.encode(bytes),
        mime_type: serializer.mime_type().to_string(),
        preview: DeckPreview {
            title: deck.title.clone(),
            subtitle: deck.subtitle.clone(),
            slide_count: deck.content_slide_count(),
            images_generated: deck.image_count(),
        },
    })
}

/// File-system safe name derived from the topic.
pub fn file_stem(topic: &str) -> String {
    let mut stem = String::with_capacity(topic.len());
    let mut pending_separator = false;
    for c in topic.trim().chars() {
        if is_name_char(c) {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c);
        } else {
            pending_separator = true;
        }
        if stem.chars().count() >= MAX_FILE_STEM_CHARS {
            break;
        }
    }
    if stem.is_empty() {
        "lesson".to_string()
    } else {
        stem
    }
}

/// Combining marks such as the Devanagari virama are not alphanumeric but
/// belong to the word.
fn is_name_char(c: char) -> bool {
    !(c.is_whitespace() || c.is_control() || c.is_ascii_punctuation())
}
