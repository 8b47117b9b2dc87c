//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - Generative-text service producing lesson JSON
//! - `ImageBackend` - Image service called once per slide
//! - `DeckSerializer` - Deck file format writer
//! - `ImageRenderer` - Upstream image model behind the image micro-service

mod deck_serializer;
mod image_backend;
mod image_renderer;
mod text_generator;

pub use deck_serializer::{DeckSerializer, SerializeError};
pub use image_backend::{ImageBackend, ImageFetchFailure, ImageRequest, ServiceHealth};
pub use image_renderer::{is_png_or_jpeg, ImageRenderer, RenderError};
pub use text_generator::{GenerationError, ProviderInfo, TextGenerator};
