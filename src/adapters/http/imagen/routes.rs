//! Axum router for the image micro-service.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{generate_image, health, ImagenAppState};

/// Create the image micro-service router.
///
/// # Routes
///
/// - `GET /health` - Liveness and key presence
/// - `POST /generate-image` - Render one image, returned as base64
pub fn imagen_router() -> Router<ImagenAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/generate-image", post(generate_image))
}
