//! Wire types of the image micro-service.
//!
//! Field names are snake_case to stay compatible with existing callers.

use serde::{Deserialize, Serialize};

use crate::application::handlers::imagen::DEFAULT_ASPECT_RATIO;

/// Body of `POST /generate-image`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateImageResponse {
    /// Base64 PNG or JPEG.
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImagenHealthResponse {
    pub status: String,
    pub api_key_set: bool,
}

/// Failure body.
#[derive(Debug, Clone, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
