//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod imagen;
pub mod lesson;

pub use imagen::{RenderImageCommand, RenderImageError, RenderImageHandler};
pub use lesson::{
    DeckPackage, DeckPreview, GenerateDeckCommand, GenerateDeckHandler, ImageGenerator,
    ResolvedImages,
};
