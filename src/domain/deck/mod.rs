//! Deck module - in-memory slide deck and the layout that produces it.

mod assembler;
mod document;

pub use assembler::{DeckAssembler, DeckTheme};
pub use document::{
    Block, DeckDocument, DeckSlide, Frame, ImageFormat, SlideKind, TextAlign, TextStyle,
    SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU,
};
