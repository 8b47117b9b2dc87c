//! Image service client configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on retries so a misconfiguration cannot stall a request.
const MAX_RETRIES: u32 = 5;

/// Image service client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// Base URL of the image micro-service; images are skipped when unset
    pub service_url: Option<String>,

    /// Aspect ratio requested for every image
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Timeout of the first attempt, which absorbs cold starts
    #[serde(default = "default_first_attempt_timeout")]
    pub first_attempt_timeout_secs: u64,

    /// Timeout of every retry
    #[serde(default = "default_retry_timeout")]
    pub retry_timeout_secs: u64,

    /// Fixed delay between attempts
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Minimum base64 length for a payload to count as an image
    #[serde(default = "default_min_payload_len")]
    pub min_payload_len: usize,

    /// Ping the service health endpoint before the fan-out
    #[serde(default = "default_warm_up")]
    pub warm_up: bool,

    /// Timeout of the warm-up probe
    #[serde(default = "default_warm_up_timeout")]
    pub warm_up_timeout_secs: u64,
}

impl ImageConfig {
    /// Configured service URL without a trailing slash, if any
    pub fn service_url(&self) -> Option<String> {
        self.service_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| u.trim_end_matches('/').to_string())
    }

    /// Check if the image service is configured
    pub fn is_configured(&self) -> bool {
        self.service_url().is_some()
    }

    pub fn first_attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.first_attempt_timeout_secs)
    }

    pub fn retry_timeout(&self) -> Duration {
        Duration::from_secs(self.retry_timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn warm_up_timeout(&self) -> Duration {
        Duration::from_secs(self.warm_up_timeout_secs)
    }

    /// Validate image client configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.service_url() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUrl {
                    field: "image.service_url",
                    value: url,
                });
            }
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries);
        }
        if self.first_attempt_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout(
                "image.first_attempt_timeout_secs",
            ));
        }
        if self.retry_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("image.retry_timeout_secs"));
        }
        if self.warm_up && self.warm_up_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("image.warm_up_timeout_secs"));
        }
        if !is_valid_aspect_ratio(&self.aspect_ratio) {
            return Err(ValidationError::InvalidAspectRatio(self.aspect_ratio.clone()));
        }
        Ok(())
    }
}

fn is_valid_aspect_ratio(ratio: &str) -> bool {
    match ratio.split_once(':') {
        Some((w, h)) => {
            matches!((w.parse::<u32>(), h.parse::<u32>()), (Ok(w), Ok(h)) if w > 0 && h > 0)
        }
        None => false,
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            aspect_ratio: default_aspect_ratio(),
            max_retries: default_max_retries(),
            first_attempt_timeout_secs: default_first_attempt_timeout(),
            retry_timeout_secs: default_retry_timeout(),
            backoff_ms: default_backoff_ms(),
            min_payload_len: default_min_payload_len(),
            warm_up: default_warm_up(),
            warm_up_timeout_secs: default_warm_up_timeout(),
        }
    }
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_first_attempt_timeout() -> u64 {
    60
}

fn default_retry_timeout() -> u64 {
    30
}

fn default_backoff_ms() -> u64 {
    2000
}

fn default_min_payload_len() -> usize {
    1000
}

fn default_warm_up() -> bool {
    true
}

fn default_warm_up_timeout() -> u64 {
    10
}
