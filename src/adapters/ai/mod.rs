//! Text Generator Adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `GeminiGenerator` - Gemini `generateContent` (default provider)
//! - `OpenAIGenerator` - OpenAI-compatible chat completions
//! - `MockTextGenerator` - Configurable mock for testing

mod gemini_generator;
mod mock_generator;
mod openai_generator;

pub use gemini_generator::{GeminiConfig, GeminiGenerator};
pub use mock_generator::{MockResponse, MockTextGenerator};
pub use openai_generator::{OpenAIConfig, OpenAIGenerator};

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::{AiConfig, AiProvider};
use crate::ports::TextGenerator;

/// Builds the configured text generator.
///
/// Returns `Ok(None)` when no API key is set; requests then fail with a
/// configuration error instead of the server refusing to start.
pub fn build_text_generator(
    config: &AiConfig,
) -> Result<Option<Arc<dyn TextGenerator>>, reqwest::Error> {
    let Some(api_key) = config
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().trim().to_string())
        .filter(|key| !key.is_empty())
    else {
        return Ok(None);
    };

    let generator: Arc<dyn TextGenerator> = match config.provider {
        AiProvider::Gemini => Arc::new(GeminiGenerator::new(
            GeminiConfig::new(api_key)
                .with_model(config.model())
                .with_base_url(config.base_url())
                .with_timeout(config.timeout())
                .with_temperature(config.temperature),
        )?),
        AiProvider::OpenAI => Arc::new(OpenAIGenerator::new(
            OpenAIConfig::new(api_key)
                .with_model(config.model())
                .with_base_url(config.base_url())
                .with_timeout(config.timeout())
                .with_temperature(config.temperature),
        )?),
    };
    Ok(Some(generator))
}
