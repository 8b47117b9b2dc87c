//! Image micro-service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration of the `imagen-service` binary
#[derive(Debug, Clone, Deserialize)]
pub struct ImagenConfig {
    /// Google API key used for image generation
    pub google_api_key: Option<Secret<String>>,

    /// Image-capable Gemini model
    #[serde(default = "default_model")]
    pub model: String,

    /// Generative Language API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Port the micro-service listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ImagenConfig {
    /// Check if a non-empty Google API key is configured
    pub fn has_api_key(&self) -> bool {
        self.google_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate micro-service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("imagen.timeout_secs"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl {
                field: "imagen.base_url",
                value: self.base_url.clone(),
            });
        }
        Ok(())
    }
}

impl Default for ImagenConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            port: default_port(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout() -> u64 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imagen_defaults() {
        let config = ImagenConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash-image");
        assert_eq!(config.port, 8000);
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_has_api_key() {
        let config = ImagenConfig {
            google_api_key: Some(Secret::new("AIza-test".to_string())),
            ..Default::default()
        };
        assert!(config.has_api_key());
    }

    #[test]
    fn test_validation_invalid_port() {
        let config = ImagenConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }
}
