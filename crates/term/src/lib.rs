//! Terminal "quiz renderer" module.
//!
//! A small rendering layer for the terminal front end. It avoids widget
//! toolkits and renders into a simple framebuffer that is diffed and flushed
//! to the terminal.
//!
//! - `quiz_view` is pure: snapshot in, framebuffer out
//! - `renderer` owns the terminal and only emits changed cells

pub mod fb;
pub mod quiz_view;
pub mod renderer;

pub use eco_quiz_core as core;
pub use eco_quiz_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use quiz_view::{QuizView, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
