//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LESSON_DECK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use lesson_deck::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod image;
mod imagen;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use image::ImageConfig;
pub use imagen::ImagenConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Shared by the `lesson-deck` API server and the `imagen-service` binary.
/// Every section has defaults, so an empty environment yields a runnable
/// (if unconfigured) server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Text generation provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Image service client configuration
    #[serde(default)]
    pub image: ImageConfig,

    /// Image micro-service configuration
    #[serde(default)]
    pub imagen: ImagenConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LESSON_DECK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LESSON_DECK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LESSON_DECK__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `LESSON_DECK__IMAGE__SERVICE_URL=http://imagen:8000` -> `image.service_url`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LESSON_DECK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.image.validate()?;
        self.imagen.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LESSON_DECK__SERVER__PORT",
        "LESSON_DECK__SERVER__ENVIRONMENT",
        "LESSON_DECK__AI__PROVIDER",
        "LESSON_DECK__AI__API_KEY",
        "LESSON_DECK__IMAGE__SERVICE_URL",
        "LESSON_DECK__IMAGE__MAX_RETRIES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.provider, AiProvider::Gemini);
        assert!(!config.image.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LESSON_DECK__AI__PROVIDER", "openai");
        env::set_var("LESSON_DECK__AI__API_KEY", "sk-xxx");
        env::set_var("LESSON_DECK__IMAGE__SERVICE_URL", "http://imagen:8000");
        env::set_var("LESSON_DECK__IMAGE__MAX_RETRIES", "1");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.provider, AiProvider::OpenAI);
        assert!(config.ai.is_configured());
        assert_eq!(
            config.image.service_url().as_deref(),
            Some("http://imagen:8000")
        );
        assert_eq!(config.image.max_retries, 1);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LESSON_DECK__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LESSON_DECK__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
