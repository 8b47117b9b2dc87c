//! Lesson Deck HTTP Server Binary
//!
//! Serves `POST /api/generate-presentation` and `GET /api/health`.
//!
//! # Environment Variables
//!
//! - `LESSON_DECK__SERVER__HOST` / `LESSON_DECK__SERVER__PORT`: bind address (default 0.0.0.0:8080)
//! - `LESSON_DECK__AI__PROVIDER`: `gemini` (default) or `openai`
//! - `LESSON_DECK__AI__API_KEY`: text generation key
//! - `LESSON_DECK__IMAGE__SERVICE_URL`: image micro-service root (images are skipped when unset)
//! - `RUST_LOG`: overrides `LESSON_DECK__SERVER__LOG_LEVEL`

use std::sync::Arc;

use axum::Router;

use lesson_deck::adapters::http::{lesson_router, with_http_layers, LessonAppState};
use lesson_deck::adapters::{build_image_backend, build_text_generator, PptxSerializer};
use lesson_deck::application::{GenerateDeckHandler, ImageGenerator};
use lesson_deck::config::AppConfig;
use lesson_deck::domain::deck::DeckAssembler;
use lesson_deck::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        provider = ?config.ai.provider,
        "starting lesson-deck server"
    );

    let text_generator = build_text_generator(&config.ai)?;
    match &text_generator {
        Some(generator) => {
            let info = generator.provider_info();
            tracing::info!(provider = %info.name, model = %info.model, "text generation ready");
        }
        None => tracing::warn!("no text generation API key set; generation requests will fail"),
    }

    let images = ImageGenerator::new(build_image_backend(&config.image), &config.image);
    if !images.is_configured() {
        tracing::warn!("no image service URL set; decks will use placeholders");
    }

    let handler = GenerateDeckHandler::new(
        text_generator,
        images,
        DeckAssembler::default(),
        Arc::new(PptxSerializer::new()),
    );

    let api = Router::new()
        .nest("/api", lesson_router())
        .with_state(LessonAppState::new(Arc::new(handler)));
    let app = with_http_layers(api, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "lesson-deck listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lesson-deck stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
