//! HTTP handlers for the image micro-service.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::imagen::{
    RenderImageCommand, RenderImageError, RenderImageHandler,
};

use super::dto::{DetailResponse, GenerateImageRequest, GenerateImageResponse, ImagenHealthResponse};

/// Application state for the image micro-service.
#[derive(Clone)]
pub struct ImagenAppState {
    pub render_handler: Arc<RenderImageHandler>,
}

impl ImagenAppState {
    pub fn new(render_handler: Arc<RenderImageHandler>) -> Self {
        Self { render_handler }
    }
}

/// GET /health
pub async fn health(State(state): State<ImagenAppState>) -> impl IntoResponse {
    let api_key_set = state.render_handler.api_key_set();
    tracing::debug!(api_key_set, "health check");
    Json(ImagenHealthResponse {
        status: "ok".to_string(),
        api_key_set,
    })
}

/// POST /generate-image
pub async fn generate_image(
    State(state): State<ImagenAppState>,
    body: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(DetailResponse::new(rejection.body_text())),
            )
                .into_response()
        }
    };

    let cmd = RenderImageCommand {
        prompt: request.prompt,
        aspect_ratio: Some(request.aspect_ratio),
    };

    match state.render_handler.handle(cmd).await {
        Ok(image) => (StatusCode::OK, Json(GenerateImageResponse { image })).into_response(),
        Err(e) => handle_render_error(e),
    }
}

fn handle_render_error(error: RenderImageError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(DetailResponse::new(error.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RenderError;

    #[test]
    fn empty_prompt_maps_to_400() {
        let response = handle_render_error(RenderImageError::EmptyPrompt);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn render_errors_map_to_500() {
        for error in [
            RenderError::MissingApiKey,
            RenderError::NoContent,
            RenderError::NoImage,
            RenderError::InvalidImage,
            RenderError::Upstream("quota".to_string()),
        ] {
            let response = handle_render_error(error.into());
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
