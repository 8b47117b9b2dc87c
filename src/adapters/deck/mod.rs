//! Deck serializers.

mod pptx_serializer;
mod pptx_templates;

pub use pptx_serializer::PptxSerializer;
pub use pptx_templates::PPTX_MIME_TYPE;
