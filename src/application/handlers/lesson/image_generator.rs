//! ImageGenerator - best-effort image client over an [`ImageBackend`].
//!
//! Every failure mode ends in `None`: unconfigured service, empty prompt,
//! error status, timeout, transport failure or a payload too small to be an
//! image. Nothing here can fail a lesson request.

use std::sync::Arc;

use crate::application::retry::RetryPolicy;
use crate::config::ImageConfig;
use crate::ports::{ImageBackend, ImageFetchFailure, ImageRequest};

/// Appended to every prompt before it is sent.
pub const STYLE_SUFFIX: &str =
    ", educational illustration, photorealistic, clear, professional, no text overlay";

/// Payloads shorter than this many base64 characters are rejected.
pub const DEFAULT_MIN_PAYLOAD_LEN: usize = 1000;

/// Image client with bounded retries.
#[derive(Clone)]
pub struct ImageGenerator {
    backend: Option<Arc<dyn ImageBackend>>,
    policy: RetryPolicy,
    probe_policy: RetryPolicy,
    aspect_ratio: String,
    min_payload_len: usize,
    warm_up: bool,
}

impl ImageGenerator {
    pub fn new(backend: Option<Arc<dyn ImageBackend>>, config: &ImageConfig) -> Self {
        Self {
            backend,
            policy: RetryPolicy::for_images(config),
            probe_policy: RetryPolicy::for_probe(config),
            aspect_ratio: config.aspect_ratio.clone(),
            min_payload_len: config.min_payload_len,
            warm_up: config.warm_up,
        }
    }

    /// A generator that never produces images.
    pub fn disabled() -> Self {
        Self::new(None, &ImageConfig::default())
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_probe_policy(mut self, policy: RetryPolicy) -> Self {
        self.probe_policy = policy;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Full prompt sent to the service.
    pub fn styled_prompt(prompt: &str) -> String {
        format!("{}{}", prompt.trim(), STYLE_SUFFIX)
    }

    /// Requests one image, returning its base64 payload or `None`.
    pub async fn generate(&self, prompt: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        if prompt.trim().is_empty() {
            return None;
        }

        let request = ImageRequest::new(Self::styled_prompt(prompt), self.aspect_ratio.clone());
        let min_len = self.min_payload_len;
        let result = self
            .policy
            .run("image", |_attempt| {
                let backend = Arc::clone(backend);
                let request = request.clone();
                async move {
                    let payload = backend.render(&request).await?;
                    let len = payload.trim().len();
                    if len < min_len {
                        return Err(ImageFetchFailure::PayloadTooSmall { len });
                    }
                    Ok(payload)
                }
            })
            .await;

        match result {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!(error = %err, "image generation abandoned");
                None
            }
        }
    }

    /// Probes the service once before a fan-out so cold instances start
    /// early. The outcome is only logged.
    pub async fn warm_up(&self) {
        if !self.warm_up {
            return;
        }
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        let result = self
            .probe_policy
            .run("image-health", |_attempt| {
                let backend = Arc::clone(backend);
                async move { backend.probe().await }
            })
            .await;

        match result {
            Ok(health) if health.is_ok() => {
                tracing::info!(api_key_set = health.api_key_set, "image service is ready")
            }
            Ok(health) => tracing::warn!(status = %health.status, "image service reported degraded health"),
            Err(err) => tracing::warn!(error = %err, "image service warm-up failed"),
        }
    }
}

impl std::fmt::Debug for ImageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerator")
            .field("configured", &self.is_configured())
            .field("policy", &self.policy)
            .field("aspect_ratio", &self.aspect_ratio)
            .finish()
    }
}
