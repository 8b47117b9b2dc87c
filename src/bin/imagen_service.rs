//! Image Micro-service Binary
//!
//! Serves `GET /health` and `POST /generate-image` on top of Gemini image
//! generation.
//!
//! # Environment Variables
//!
//! - `LESSON_DECK__IMAGEN__GOOGLE_API_KEY`, or `GOOGLE_API_KEY` as a fallback
//! - `LESSON_DECK__IMAGEN__PORT`: listen port (default 8000)
//! - `LESSON_DECK__IMAGEN__MODEL`: image model (default gemini-2.5-flash-image)
//! - `RUST_LOG`: overrides `LESSON_DECK__SERVER__LOG_LEVEL`

use std::sync::Arc;

use secrecy::Secret;

use lesson_deck::adapters::http::{imagen_router, with_http_layers, ImagenAppState};
use lesson_deck::adapters::GeminiImageRenderer;
use lesson_deck::application::RenderImageHandler;
use lesson_deck::config::{AppConfig, ServerConfig};
use lesson_deck::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    init_tracing(&config.server);

    if !config.imagen.has_api_key() {
        config.imagen.google_api_key = std::env::var("GOOGLE_API_KEY").ok().map(Secret::new);
    }
    config.imagen.validate()?;

    let renderer = GeminiImageRenderer::from_config(&config.imagen)?;
    tracing::info!(
        model = %config.imagen.model,
        api_key_set = config.imagen.has_api_key(),
        "starting imagen-service"
    );

    let handler = RenderImageHandler::new(Arc::new(renderer));
    let app = imagen_router().with_state(ImagenAppState::new(Arc::new(handler)));
    let server = ServerConfig {
        static_dir: None,
        ..config.server.clone()
    };
    let app = with_http_layers(app, &server);

    let addr = config.server.socket_addr_for(config.imagen.port)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "imagen-service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    Ok(())
}
