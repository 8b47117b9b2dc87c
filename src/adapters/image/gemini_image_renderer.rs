//! Gemini Image Renderer - ImageRenderer over Gemini image generation.
//!
//! Asks `generateContent` for a single IMAGE candidate and returns the bytes
//! of the first inline-data part.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ImagenConfig;
use crate::ports::{ImageRenderer, RenderError};

/// Gemini image renderer.
pub struct GeminiImageRenderer {
    api_key: Option<Secret<String>>,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiImageRenderer {
    pub fn new(
        api_key: Option<Secret<String>>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.filter(|key| !key.expose_secret().trim().is_empty()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ImagenConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.google_api_key.clone(),
            &config.model,
            &config.base_url,
            config.timeout(),
        )
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn to_request(prompt: &str, aspect_ratio: &str) -> ImageGenerationRequest {
        ImageGenerationRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                candidate_count: 1,
                image_config: ImageOptions {
                    aspect_ratio: aspect_ratio.to_string(),
                },
            },
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_HATE_SPEECH".to_string(),
                threshold: "BLOCK_LOW_AND_ABOVE".to_string(),
            }],
        }
    }

    /// Picks the first inline image out of a response.
    fn extract_image(response: ImageGenerationResponse) -> Result<Vec<u8>, RenderError> {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or(RenderError::NoContent)?;

        let inline = parts
            .into_iter()
            .find_map(|part| part.inline_data)
            .ok_or(RenderError::NoImage)?;

        STANDARD
            .decode(inline.data.trim())
            .map_err(|_| RenderError::InvalidImage)
    }
}

#[async_trait]
impl ImageRenderer for GeminiImageRenderer {
    async fn render(&self, prompt: &str, aspect_ratio: &str) -> Result<Vec<u8>, RenderError> {
        let api_key = self.api_key.as_ref().ok_or(RenderError::MissingApiKey)?;
        tracing::info!(
            prompt = %prompt.chars().take(70).collect::<String>(),
            aspect_ratio,
            "generating image"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key.expose_secret().as_str())
            .json(&Self::to_request(prompt, aspect_ratio))
            .send()
            .await
            .map_err(|e| RenderError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Upstream(format!(
                "status {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let body: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| RenderError::Upstream(e.to_string()))?;
        Self::extract_image(body)
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationRequest {
    contents: Vec<RequestContent>,
    generation_config: ImageGenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
    candidate_count: u32,
    image_config: ImageOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageOptions {
    aspect_ratio: String,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}
