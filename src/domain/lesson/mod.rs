//! Lesson module - request validation, prompt construction and content repair.
//!
//! A lesson flows through this module in order: [`LessonRequest`] validates
//! caller input, [`LessonPrompt`] turns it into generation instructions, and
//! [`parse_generated_json`] plus [`normalize`] turn raw generated text into a
//! [`LessonContent`] that is safe to lay out.

mod content;
mod errors;
mod normalizer;
mod parse;
mod prompt;
mod request;

pub use content::{LessonContent, Slide};
pub use errors::LessonError;
pub use normalizer::{
    normalize, normalize_bullets, shorten_bullet, split_sentences, MAX_BULLETS,
    MAX_BULLET_CHARS, MISSING_CONTENT_BULLET,
};
pub use parse::{parse_generated_json, strip_code_fences};
pub use prompt::{
    language_directive, local_context, LessonPrompt, ToneBand, OUTPUT_SCHEMA,
    PROMPT_BULLET_MAX_CHARS,
};
pub use request::{
    clamp_presenter_age, clamp_slide_count, AreaType, Language, LessonRequest, LessonRequestInput,
    DEFAULT_PRESENTER_AGE, DEFAULT_SLIDES, MAX_PRESENTER_AGE, MAX_SLIDES, MIN_PRESENTER_AGE,
    MIN_SLIDES, MIN_TOPIC_CHARS,
};
