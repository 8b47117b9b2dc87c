//! RenderImageHandler - Command handler behind the image micro-service.
//!
//! Validates the prompt, calls the upstream renderer, checks the bytes are
//! a PNG or JPEG and returns them base64-encoded.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::ports::{is_png_or_jpeg, ImageRenderer, RenderError};

pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Command to render one image.
#[derive(Debug, Clone)]
pub struct RenderImageCommand {
    pub prompt: String,
    pub aspect_ratio: Option<String>,
}

/// Errors returned by the image micro-service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderImageError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl RenderImageError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, RenderImageError::EmptyPrompt)
    }
}

/// Handler for image rendering.
pub struct RenderImageHandler {
    renderer: Arc<dyn ImageRenderer>,
}

impl RenderImageHandler {
    pub fn new(renderer: Arc<dyn ImageRenderer>) -> Self {
        Self { renderer }
    }

    pub fn api_key_set(&self) -> bool {
        self.renderer.has_credentials()
    }

    /// Renders the image and returns it as base64.
    pub async fn handle(&self, cmd: RenderImageCommand) -> Result<String, RenderImageError> {
        let prompt = cmd.prompt.trim();
        if prompt.is_empty() {
            return Err(RenderImageError::EmptyPrompt);
        }
        if !self.renderer.has_credentials() {
            return Err(RenderError::MissingApiKey.into());
        }

        let aspect_ratio = cmd
            .aspect_ratio
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ASPECT_RATIO);

        let bytes = self.renderer.render(prompt, aspect_ratio).await.map_err(|e| {
            tracing::error!(error = %e, "image rendering failed");
            e
        })?;
        if !is_png_or_jpeg(&bytes) {
            tracing::error!(len = bytes.len(), "rendered bytes are not PNG or JPEG");
            return Err(RenderError::InvalidImage.into());
        }

        tracing::info!(bytes = bytes.len(), aspect_ratio, "image rendered");
        Ok(STANDARD.encode(bytes))
    }
}
