//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod retry;

pub use handlers::{
    DeckPackage, DeckPreview, GenerateDeckCommand, GenerateDeckHandler, ImageGenerator,
    RenderImageCommand, RenderImageError, RenderImageHandler, ResolvedImages,
};
pub use retry::{AttemptFailure, RetryError, RetryPolicy};
