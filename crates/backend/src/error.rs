//! Backend error type.

use thiserror::Error;

use crate::core::QuizError;

/// Errors talking to the quiz backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    /// Payload could not be decoded.
    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local question file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetched content cannot start a session.
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// Backend refused the call.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;
