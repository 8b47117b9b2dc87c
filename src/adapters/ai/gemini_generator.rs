//! Gemini Generator - TextGenerator over the Gemini `generateContent` REST API.
//!
//! Requests `application/json` output so the model answers with the lesson
//! object directly. The API key travels in the `x-goog-api-key` header.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::openai_generator::{error_message, map_transport_error};
use crate::ports::{GenerationError, ProviderInfo, TextGenerator};

/// Configuration for the Gemini generator.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(120),
            temperature: 0.7,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini text generator.
pub struct GeminiGenerator {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn to_gemini_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    async fn send_request(&self, prompt: &str) -> Result<Response, GenerationError> {
        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&self.to_gemini_request(prompt))
            .send()
            .await
            .map_err(map_transport_error)
    }

    fn extract_text(response: GeminiResponse) -> Result<String, GenerationError> {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(GenerationError::ContentFiltered(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            if candidate.finish_reason.as_deref() == Some("SAFETY") {
                return Err(GenerationError::ContentFiltered(
                    "response blocked for safety".to_string(),
                ));
            }
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self.send_request(prompt).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::status(status.as_u16(), error_message(&body)));
        }
        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        Self::extract_text(body)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("g-key")
            .with_model("gemini-2.0-flash")
            .with_base_url("https://example.test/v1beta/")
            .with_timeout(Duration::from_secs(45));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "https://example.test/v1beta");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.api_key(), "g-key");
    }

    #[test]
    fn url_targets_model() {
        let generator = GeminiGenerator::new(GeminiConfig::new("k")).unwrap();
        assert_eq!(
            generator.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_uses_camel_case_and_json_mime_type() {
        let generator = GeminiGenerator::new(GeminiConfig::new("k")).unwrap();
        let json = serde_json::to_value(generator.to_gemini_request("Make slides")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Make slides");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn joins_text_parts() {
        let text = GeminiGenerator::extract_text(response(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"slides\""},{"text":":[]}"}]},"finishReason":"STOP"}]}"#,
        ))
        .unwrap();
        assert_eq!(text, "{\"slides\":[]}");
    }

    #[test]
    fn blocked_prompt_is_content_filtered() {
        let err = GeminiGenerator::extract_text(response(
            r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, GenerationError::ContentFiltered(_)));
    }

    #[test]
    fn safety_stop_without_text_is_content_filtered() {
        let err = GeminiGenerator::extract_text(response(
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, GenerationError::ContentFiltered(_)));
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let err = GeminiGenerator::extract_text(response("{}")).unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
    }
}
