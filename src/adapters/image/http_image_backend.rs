//! HTTP Image Backend - ImageBackend over the image micro-service.
//!
//! `POST {base}/generate-image` with `{prompt, aspect_ratio}` answers
//! `{image}`; `GET {base}/health` answers `{status, api_key_set}`. Timeouts
//! are applied per attempt by the caller, so the client itself has none.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::ports::{ImageBackend, ImageFetchFailure, ImageRequest, ServiceHealth};

/// Image service client.
#[derive(Debug, Clone)]
pub struct HttpImageBackend {
    base_url: String,
    client: Client,
}

impl HttpImageBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/generate-image", self.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    async fn check_status(response: Response) -> Result<Response, ImageFetchFailure> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ImageFetchFailure::Status {
            code: status.as_u16(),
            body: detail(&body),
        })
    }
}

#[async_trait]
impl ImageBackend for HttpImageBackend {
    async fn render(&self, request: &ImageRequest) -> Result<String, ImageFetchFailure> {
        let response = self
            .client
            .post(self.generate_url())
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = Self::check_status(response).await?;
        let body: GenerateImageResponse = response
            .json()
            .await
            .map_err(|e| ImageFetchFailure::InvalidResponse(e.to_string()))?;
        body.image
            .filter(|image| !image.trim().is_empty())
            .ok_or_else(|| ImageFetchFailure::InvalidResponse("missing 'image' field".to_string()))
    }

    async fn probe(&self) -> Result<ServiceHealth, ImageFetchFailure> {
        let response = self
            .client
            .get(self.health_url())
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ImageFetchFailure::InvalidResponse(e.to_string()))
    }
}

fn map_transport_error(err: reqwest::Error) -> ImageFetchFailure {
    if err.is_timeout() {
        ImageFetchFailure::Timeout
    } else {
        ImageFetchFailure::Network(err.to_string())
    }
}

/// Error text from a `{"detail": ...}` body, or the body itself.
fn detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

#[derive(Debug, Deserialize)]
struct GenerateImageResponse {
    image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_base() {
        let backend = HttpImageBackend::new("http://localhost:8000/");
        assert_eq!(backend.generate_url(), "http://localhost:8000/generate-image");
        assert_eq!(backend.health_url(), "http://localhost:8000/health");
    }

    #[test]
    fn detail_is_extracted_from_error_body() {
        assert_eq!(detail(r#"{"detail":"Prompt cannot be empty"}"#), "Prompt cannot be empty");
        assert_eq!(detail("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn request_serializes_snake_case() {
        let json = serde_json::to_value(ImageRequest::new("a leaf", "16:9")).unwrap();
        assert_eq!(json["prompt"], "a leaf");
        assert_eq!(json["aspect_ratio"], "16:9");
    }

    #[tokio::test]
    async fn unreachable_service_is_network_failure() {
        let client = Client::builder().no_proxy().build().unwrap();
        let backend = HttpImageBackend::with_client("http://127.0.0.1:1", client);
        let err = backend
            .render(&ImageRequest::new("a leaf", "16:9"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImageFetchFailure::Network(_)));
    }
}
