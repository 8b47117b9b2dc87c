//! Extraction of the JSON document from raw generated text.

use serde_json::Value;

use super::errors::LessonError;

/// Removes markdown code-fence markers around generated text.
///
/// Handles a leading "```" or "```json" line and a trailing "```". Text
/// without fences is returned trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the first newline.
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parses generated text into a JSON value.
///
/// Only fences are removed; prose around the JSON is a parse failure.
///
/// # Errors
///
/// Returns `LessonError::Parse` for empty, truncated or prose-wrapped output.
pub fn parse_generated_json(raw: &str) -> Result<Value, LessonError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(LessonError::parse("generation service returned no content"));
    }
    serde_json::from_str(text).map_err(|e| LessonError::parse(e.to_string()))
}
