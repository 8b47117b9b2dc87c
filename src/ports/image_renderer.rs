//! Image Renderer Port - Interface for the upstream image model used by the
//! image micro-service.

use async_trait::async_trait;
use thiserror::Error;

/// Port for rendering one image from a prompt.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Renders an image and returns its raw bytes.
    async fn render(&self, prompt: &str, aspect_ratio: &str) -> Result<Vec<u8>, RenderError>;

    /// Whether an upstream credential is configured.
    fn has_credentials(&self) -> bool;
}

/// Errors from image rendering. Messages are returned to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("GOOGLE_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("No content returned")]
    NoContent,

    #[error("No images generated")]
    NoImage,

    #[error("Returned data is not a valid PNG or JPEG")]
    InvalidImage,

    #[error("Image generation failed: {0}")]
    Upstream(String),
}

/// Returns true when `bytes` start with a PNG or JPEG signature.
pub fn is_png_or_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(b"\x89PNG") || bytes.starts_with(&[0xFF, 0xD8, 0xFF])
}
