//! Lesson Deck - Illustrated lesson slide decks from a single topic
//!
//! This crate turns a lesson request into a PowerPoint deck: it prompts a
//! text generation service for structured lesson content, fetches one image
//! per slide from an image service, lays the slides out and packages the
//! `.pptx` for download.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
