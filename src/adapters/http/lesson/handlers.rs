//! HTTP handlers for lesson deck endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::lesson::{GenerateDeckCommand, GenerateDeckHandler};
use crate::domain::lesson::LessonError;

use super::dto::{ErrorResponse, GenerateDeckRequest, GenerateDeckResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Application state for lesson endpoints.
#[derive(Clone)]
pub struct LessonAppState {
    pub generate_handler: Arc<GenerateDeckHandler>,
}

impl LessonAppState {
    pub fn new(generate_handler: Arc<GenerateDeckHandler>) -> Self {
        Self { generate_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/generate-presentation - Build a lesson deck
pub async fn generate_presentation(
    State(state): State<LessonAppState>,
    body: Result<Json<GenerateDeckRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected lesson request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response();
        }
    };

    let cmd = GenerateDeckCommand {
        input: request.into_input(),
    };

    match state.generate_handler.handle(cmd).await {
        Ok(package) => {
            let response: GenerateDeckResponse = package.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_lesson_error(e),
    }
}

/// GET /api/health - Liveness and configuration flags
pub async fn health(State(state): State<LessonAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        text_generation_configured: state.generate_handler.text_generation_configured(),
        image_service_configured: state.generate_handler.image_service_configured(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

fn status_for(error: &LessonError) -> StatusCode {
    match error {
        LessonError::Validation { .. } => StatusCode::BAD_REQUEST,
        LessonError::Configuration(_) | LessonError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        LessonError::Generation(_) | LessonError::Parse(_) | LessonError::Schema(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn handle_lesson_error(error: LessonError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(code = error.code(), error = %error, "lesson deck request failed");
    } else {
        tracing::info!(code = error.code(), error = %error, "lesson deck request rejected");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let response = handle_lesson_error(LessonError::validation("topic", "too short"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn configuration_and_serialization_map_to_500() {
        assert_eq!(
            status_for(&LessonError::configuration("no key")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&LessonError::serialization("zip")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_stage_failures_map_to_502() {
        for error in [
            LessonError::generation("timeout"),
            LessonError::parse("bad json"),
            LessonError::schema("no slides"),
        ] {
            assert_eq!(status_for(&error), StatusCode::BAD_GATEWAY);
        }
    }
}
