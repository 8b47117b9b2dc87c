//! HTTP adapters - REST API implementations.
//!
//! - `lesson` - Deck generation API served by `lesson-deck`
//! - `imagen` - Image micro-service API served by `imagen-service`

pub mod imagen;
pub mod lesson;

pub use imagen::{imagen_router, ImagenAppState};
pub use lesson::{lesson_router, LessonAppState};

use axum::Router;
use http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Builds the CORS layer. No configured origins means any origin.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Wraps a router with request ids, tracing, CORS and the optional static
/// frontend.
pub fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let router = match server.static_dir.as_deref().filter(|dir| !dir.trim().is_empty()) {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(server))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn responses_carry_request_id() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let app = with_http_layers(router, &ServerConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn configured_origin_is_allowed() {
        let server = ServerConfig {
            cors_origins: Some("http://localhost:5173".to_string()),
            ..Default::default()
        };
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let response = with_http_layers(router, &server)
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn preflight_is_answered_with_request_id() {
        let router = Router::new().route("/ping", axum::routing::post(|| async { "pong" }));
        let response = with_http_layers(router, &ServerConfig::default())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/ping")
                    .header("origin", "http://example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
        assert!(response.headers().contains_key("x-request-id"));
    }
}
