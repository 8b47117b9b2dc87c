//! Lesson HTTP adapter - REST API for deck generation.
//!
//! Provides endpoints for:
//! - Generating a lesson deck
//! - Health and configuration flags

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;

pub use handlers::LessonAppState;
pub use routes::lesson_router;
