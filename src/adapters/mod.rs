//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Text generators (Gemini, OpenAI, mock)
//! - `image` - Image service client, Gemini image renderer, mock
//! - `deck` - PPTX serializer
//! - `http` - Axum routers for both binaries

pub mod ai;
pub mod deck;
pub mod http;
pub mod image;

pub use ai::{build_text_generator, MockTextGenerator};
pub use deck::PptxSerializer;
pub use image::{build_image_backend, GeminiImageRenderer, HttpImageBackend, MockImageBackend};
