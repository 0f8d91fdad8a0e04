//! Error type for session setup and question handling.

use thiserror::Error;

use crate::types::QuestionError;

/// Errors raised by the core quiz logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A question failed validation while being built.
    #[error("invalid question `{id}`: {source}")]
    InvalidQuestion {
        /// Question id as received.
        id: String,
        #[source]
        source: QuestionError,
    },

    /// The correct option could not be located after reordering options.
    #[error("question `{id}` lost its correct option `{option_id}` while shuffling")]
    CorrectOptionLost {
        /// Question id.
        id: String,
        /// Correct option id before the shuffle.
        option_id: String,
    },

    /// The requested level does not map onto any questions.
    #[error("level {level_sequence} has no question window")]
    InvalidLevel {
        /// One-based level sequence within the chapter.
        level_sequence: u32,
    },

    /// No questions were available to start a session.
    #[error("no questions available for category `{category}`")]
    EmptyPool {
        /// Category that was fetched.
        category: String,
    },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, QuizError>;
