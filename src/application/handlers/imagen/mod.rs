//! Image micro-service handlers.

mod render_image;

pub use render_image::{
    RenderImageCommand, RenderImageError, RenderImageHandler, DEFAULT_ASPECT_RATIO,
};
