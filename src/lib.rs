//! Eco quiz (workspace facade crate).
//!
//! Re-exports the workspace crates as `eco_quiz::{backend,core,input,term,types}`
//! so the binary, integration tests and benches share one import path.

pub use eco_quiz_backend as backend;
pub use eco_quiz_core as core;
pub use eco_quiz_input as input;
pub use eco_quiz_term as term;
pub use eco_quiz_types as types;
