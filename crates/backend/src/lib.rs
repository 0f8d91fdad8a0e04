//! Backend module - the quiz's external collaborators
//!
//! A session needs two things from outside: a question pool before it starts,
//! and somewhere to report the result when it ends. This crate holds the
//! boundary for both.
//!
//! # Endpoints
//!
//! | Call | HTTP |
//! |------|------|
//! | fetch questions | `GET <base>/<question_path>/<category>` |
//! | level progress | `POST <base>/progress/level` `{levelId, score}` |
//! | chapter completion | `POST <base>/progress/chapter` `{chapterSequence, score, money}` |
//! | question stats | `POST <base>/questions/stats` `{category, totalAnswered, correctCount}` |
//!
//! Questions arrive in the wire shape of [`dto::QuestionDto`] and are
//! validated on the way in; malformed ones are skipped.
//!
//! # Report Semantics
//!
//! Reports are fire-once and best-effort: each call is attempted once at the
//! end of a completed session, failures are logged with `warn` and never
//! retried. Sessions the player left early report nothing.
//!
//! # Environment Variables
//!
//! - `ECOQUIZ_API_BASE`: base URL (default: "http://127.0.0.1:3000/api")
//! - `ECOQUIZ_API_TOKEN`: bearer token, optional
//! - `ECOQUIZ_QUESTION_PATH`: question endpoint (default: "questions")
//! - `ECOQUIZ_QUESTIONS_FILE`: play offline from a JSON file instead
//! - `ECOQUIZ_CATEGORY`, `ECOQUIZ_LEVEL`, `ECOQUIZ_LEVEL_ID`, `ECOQUIZ_CHAPTER`: what to play
//! - `ECOQUIZ_SEED`: fixed RNG seed
//!
//! # Implementation
//!
//! - [`client::HttpBackend`] uses **reqwest** on the **tokio** runtime
//! - [`memory::MemoryBackend`] serves fixed pools and records reports
//! - [`controller::SessionController`] ties a backend to the session lifecycle

pub mod client;
pub mod config;
pub mod controller;
pub mod dto;
pub mod error;
pub mod memory;

pub use eco_quiz_core as core;
pub use eco_quiz_types as types;

pub use client::{HttpBackend, QuizBackend};
pub use config::{BackendConfig, QuestionSource, QuizConfig};
pub use controller::{ReportOutcome, SessionController};
pub use dto::{questions_from_dtos, QuestionDto};
pub use error::BackendError;
pub use memory::{MemoryBackend, Report};
