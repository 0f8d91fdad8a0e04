//! Terminal input module (session-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::QuizAction`]. The mapping is
//! context-free; the session ignores actions that make no sense in its
//! current phase.

pub mod map;

pub use eco_quiz_types as types;

pub use map::{handle_key_event, should_quit};
