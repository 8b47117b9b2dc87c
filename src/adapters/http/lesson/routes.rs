//! Axum router configuration for lesson deck endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{generate_presentation, health, LessonAppState};

/// Create the lesson API router.
///
/// # Routes
///
/// - `POST /generate-presentation` - Generate a deck from a lesson request
/// - `GET /health` - Liveness and configuration flags
///
/// Suitable for mounting at `/api`.
pub fn lesson_router() -> Router<LessonAppState> {
    Router::new()
        .route("/generate-presentation", post(generate_presentation))
        .route("/health", get(health))
}
