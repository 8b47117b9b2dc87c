//! Lesson content produced by generation and normalization.

use serde::{Deserialize, Serialize};

/// One lesson slide after normalization.
///
/// `content` always holds between one and five bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub content: Vec<String>,
    pub speaker_notes: String,
    pub image_prompt: String,
}

impl Slide {
    pub fn has_notes(&self) -> bool {
        !self.speaker_notes.trim().is_empty()
    }
}

/// A complete, normalized lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub slides: Vec<Slide>,
}

impl LessonContent {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Image prompts in slide order.
    pub fn image_prompts(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.image_prompt.clone()).collect()
    }
}
