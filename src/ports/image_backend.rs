//! Image Backend Port - Interface for the image generation service.
//!
//! A backend performs exactly one request per call. Retries, timeouts and
//! the decision to give up belong to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for image generation.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Requests one image and returns its base64 payload.
    async fn render(&self, request: &ImageRequest) -> Result<String, ImageFetchFailure>;

    /// Checks that the service is reachable.
    async fn probe(&self) -> Result<ServiceHealth, ImageFetchFailure>;
}

/// One image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: String,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: aspect_ratio.into(),
        }
    }
}

/// Health reported by the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub api_key_set: bool,
}

impl ServiceHealth {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Why a single image attempt failed. Never surfaces past the image client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageFetchFailure {
    #[error("image service returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("payload too small: {len} characters")]
    PayloadTooSmall { len: usize },

    #[error("request timed out")]
    Timeout,
}
