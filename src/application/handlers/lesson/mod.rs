//! Lesson deck handlers.

mod fan_out;
mod generate_deck;
mod image_generator;
mod packager;

pub use fan_out::{fan_out_images, ResolvedImages};
pub use generate_deck::{GenerateDeckCommand, GenerateDeckHandler};
pub use image_generator::{ImageGenerator, DEFAULT_MIN_PAYLOAD_LEN, STYLE_SUFFIX};
pub use packager::{file_stem, package, DeckPackage, DeckPreview};
