//! Domain layer containing lesson and deck types.
//!
//! # Module Organization
//!
//! - `lesson` - Request validation, prompt building and content normalization
//! - `deck` - Deck model and layout

pub mod deck;
pub mod lesson;
