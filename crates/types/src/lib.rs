//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the quiz.
//! All types are pure data structures (only `thiserror` for the validation
//! error), usable in any context: session logic, terminal rendering and
//! backend wire mapping.
//!
//! # Session Shape
//!
//! - **Questions per session**: 10
//! - **Options per question**: any number, usually 4 (labelled A-D on screen)
//!
//! # Phase Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 50 | Front-end fixed timestep |
//! | `INFO_PHASE_MS` | 1500 | Ordinal/category card before the question |
//! | `QUESTION_PHASE_MS` | 1000 | Question text before the options appear |
//! | `COUNTDOWN_TICK_MS` | 1000 | Countdown period |
//! | `ANSWER_REVEAL_MS` | 1500 | Revealed answer stays on screen |
//! | `TRANSITION_MS` | 400 | Gap between two questions |
//!
//! # Rewards
//!
//! | Score | Stars |
//! |-------|-------|
//! | >= 1600 | 3 |
//! | >= 1000 | 2 |
//! | >= 600 | 1 |
//! | below | 0 |
//!
//! Currency is `floor(score / 200) * 10`.
//!
//! # Examples
//!
//! ```
//! use eco_quiz_types::{Phase, QuizAction, Question, QuizOption};
//!
//! let q = Question::new(
//!     "q1",
//!     "paper",
//!     "Which bin takes newspapers?",
//!     vec![QuizOption::new("A", "Blue"), QuizOption::new("B", "Green")],
//!     "A",
//! )
//! .unwrap();
//! assert_eq!(q.correct, 0);
//! assert_eq!(q.correct_option().map(|o| o.id.as_str()), Some("A"));
//!
//! assert_eq!(Phase::from_str("show-options"), Some(Phase::ShowOptions));
//! assert_eq!(QuizAction::from_str("select:2"), Some(QuizAction::Select(2)));
//! ```

use std::fmt;

use thiserror::Error;

/// Number of questions in one session.
pub const QUESTIONS_PER_SESSION: usize = 10;

/// Fixed timestep of the terminal front end (50ms).
pub const TICK_MS: u32 = 50;

/// Duration of the `show-info` phase.
pub const INFO_PHASE_MS: u32 = 1500;

/// Duration of the `show-question` phase (2.5s after question start in total).
pub const QUESTION_PHASE_MS: u32 = 1000;

/// Seconds on the answer countdown.
pub const COUNTDOWN_SECS: u8 = 8;

/// Countdown tick period.
pub const COUNTDOWN_TICK_MS: u32 = 1000;

/// How long an answered (or timed-out) question stays revealed.
pub const ANSWER_REVEAL_MS: u32 = 1500;

/// Duration of the `transitioning` phase between two questions.
pub const TRANSITION_MS: u32 = 400;

/// Points for an instant correct answer.
pub const MAX_POINTS_PER_QUESTION: u32 = 200;

/// Points lost for every elapsed countdown second.
pub const POINTS_LOST_PER_SECOND: u32 = 25;

/// Score thresholds for 1, 2 and 3 stars.
///
/// Not evenly spaced.
pub const STAR_THRESHOLDS: [u32; 3] = [600, 1000, 1600];

/// Score needed for one currency step.
pub const POINTS_PER_CURRENCY_STEP: u32 = 200;

/// Currency granted per step.
pub const CURRENCY_PER_STEP: u32 = 10;

/// Default questions per level in the backend ordering.
pub const QUESTIONS_PER_LEVEL: usize = 20;

/// Default levels per chapter in the backend ordering.
pub const LEVELS_PER_CHAPTER: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_timing_defaults() {
        assert_eq!(INFO_PHASE_MS + QUESTION_PHASE_MS, 2500);
        assert_eq!(COUNTDOWN_SECS, 8);
        assert_eq!(COUNTDOWN_TICK_MS, 1000);
        assert_eq!(
            MAX_POINTS_PER_QUESTION,
            POINTS_LOST_PER_SECOND * COUNTDOWN_SECS as u32
        );
    }

    #[test]
    fn question_rejects_unknown_correct_id() {
        let err = Question::new(
            "q",
            "paper",
            "?",
            vec![QuizOption::new("A", "a"), QuizOption::new("B", "b")],
            "C",
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectOption("C".to_string()));
    }

    #[test]
    fn question_rejects_duplicate_option_ids() {
        let err = Question::new(
            "q",
            "paper",
            "?",
            vec![QuizOption::new("A", "a"), QuizOption::new("A", "b")],
            "A",
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("A".to_string()));
    }

    #[test]
    fn question_rejects_empty_options() {
        let err = Question::new("q", "paper", "?", Vec::new(), "A").unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn hand_built_question_with_bad_index_fails_validation() {
        let mut q = Question::new(
            "q",
            "paper",
            "?",
            vec![QuizOption::new("A", "a"), QuizOption::new("B", "b")],
            "B",
        )
        .unwrap();
        assert_eq!(q.validate(), Ok(()));

        q.correct = 5;
        assert_eq!(q.correct_option(), None);
        assert_eq!(
            q.validate(),
            Err(QuestionError::CorrectOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            q.validate().unwrap_err().to_string(),
            "correct index 5 is out of range for 2 options"
        );
    }

    #[test]
    fn action_parse_roundtrip() {
        for action in [
            QuizAction::Select(0),
            QuizAction::Select(3),
            QuizAction::Exit,
            QuizAction::ConfirmExit,
            QuizAction::CancelExit,
            QuizAction::Replay,
        ] {
            assert_eq!(QuizAction::from_str(&action.to_string()), Some(action));
        }
        assert_eq!(QuizAction::from_str("select:x"), None);
        assert_eq!(QuizAction::from_str("jump"), None);
    }

    #[test]
    fn option_letters() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(26), '?');
    }
}

/// One answer choice of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizOption {
    /// Stable identifier (usually a letter).
    pub id: String,
    /// Display text.
    pub text: String,
}

impl QuizOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Validation failures when building a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question has no options")]
    NoOptions,
    #[error("duplicate option id `{0}`")]
    DuplicateOption(String),
    #[error("correct option `{0}` is not among the options")]
    UnknownCorrectOption(String),
    #[error("correct index {index} is out of range for {len} options")]
    CorrectOutOfRange { index: usize, len: usize },
}

/// A quiz question with its options and the index of the correct one.
///
/// [`Question::new`] guarantees unique option ids and an in-range `correct`.
/// Values assembled field by field can be checked with [`Question::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub id: String,
    pub category: String,
    pub content: String,
    pub options: Vec<QuizOption>,
    pub correct: usize,
}

fn check_options(options: &[QuizOption]) -> Result<(), QuestionError> {
    if options.is_empty() {
        return Err(QuestionError::NoOptions);
    }
    for (i, opt) in options.iter().enumerate() {
        if options[..i].iter().any(|o| o.id == opt.id) {
            return Err(QuestionError::DuplicateOption(opt.id.clone()));
        }
    }
    Ok(())
}

impl Question {
    /// Build a question, resolving the correct option by id.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
        options: Vec<QuizOption>,
        correct_id: &str,
    ) -> Result<Self, QuestionError> {
        check_options(&options)?;
        let correct = options
            .iter()
            .position(|o| o.id == correct_id)
            .ok_or_else(|| QuestionError::UnknownCorrectOption(correct_id.to_string()))?;

        Ok(Self {
            id: id.into(),
            category: category.into(),
            content: content.into(),
            options,
            correct,
        })
    }

    /// Re-check the invariants [`Question::new`] establishes.
    pub fn validate(&self) -> Result<(), QuestionError> {
        check_options(&self.options)?;
        if self.correct >= self.options.len() {
            return Err(QuestionError::CorrectOutOfRange {
                index: self.correct,
                len: self.options.len(),
            });
        }
        Ok(())
    }

    /// The correct option, or `None` if `correct` is out of range.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.get(self.correct)
    }

    /// Index of the option with the given id.
    pub fn option_index(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|o| o.id == id)
    }
}

/// Letter shown next to an option on screen.
pub fn option_label(index: usize) -> char {
    if index < 26 {
        (b'A' + index as u8) as char
    } else {
        '?'
    }
}

/// Phase of the current question's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Question ordinal and category card
    ShowInfo,
    /// Question text revealed
    ShowQuestion,
    /// Options visible, countdown running
    ShowOptions,
    /// Between two questions
    Transitioning,
    /// Terminal
    GameEnded,
}

impl Phase {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "show-info" => Some(Phase::ShowInfo),
            "show-question" => Some(Phase::ShowQuestion),
            "show-options" => Some(Phase::ShowOptions),
            "transitioning" => Some(Phase::Transitioning),
            "game-ended" => Some(Phase::GameEnded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::ShowInfo => "show-info",
            Phase::ShowQuestion => "show-question",
            Phase::ShowOptions => "show-options",
            Phase::Transitioning => "transitioning",
            Phase::GameEnded => "game-ended",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameEnded)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of play-through a session is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Sample from the whole category pool.
    Challenge { category: String },
    /// One level of a chapter.
    Level {
        level_id: String,
        chapter_sequence: u32,
        level_sequence: u32,
        category: String,
    },
}

impl SessionKind {
    pub fn category(&self) -> &str {
        match self {
            SessionKind::Challenge { category } => category,
            SessionKind::Level { category, .. } => category,
        }
    }

    pub fn is_challenge(&self) -> bool {
        matches!(self, SessionKind::Challenge { .. })
    }
}

/// Player intents delivered to a session.
///
/// Keyboard input and scripted drivers both map onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizAction {
    /// Pick the option at this index
    Select(usize),
    /// Ask to leave (needs confirmation during play)
    Exit,
    /// Confirm a pending exit
    ConfirmExit,
    /// Dismiss a pending exit
    CancelExit,
    /// Start over with a fresh question set
    Replay,
}

impl QuizAction {
    /// Parse an action from its string form.
    ///
    /// ```
    /// use eco_quiz_types::QuizAction;
    ///
    /// assert_eq!(QuizAction::from_str("Exit"), Some(QuizAction::Exit));
    /// assert_eq!(QuizAction::from_str("select:1"), Some(QuizAction::Select(1)));
    /// assert_eq!(QuizAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(idx) = lower.strip_prefix("select:") {
            return idx.parse().ok().map(QuizAction::Select);
        }
        match lower.as_str() {
            "exit" => Some(QuizAction::Exit),
            "confirmexit" | "confirm" => Some(QuizAction::ConfirmExit),
            "cancelexit" | "cancel" => Some(QuizAction::CancelExit),
            "replay" => Some(QuizAction::Replay),
            _ => None,
        }
    }
}

impl fmt::Display for QuizAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizAction::Select(i) => write!(f, "select:{i}"),
            QuizAction::Exit => f.write_str("exit"),
            QuizAction::ConfirmExit => f.write_str("confirmExit"),
            QuizAction::CancelExit => f.write_str("cancelExit"),
            QuizAction::Replay => f.write_str("replay"),
        }
    }
}

/// What happened to a question once it left `show-options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerRecord {
    Selected(usize),
    TimedOut,
}

impl AnswerRecord {
    pub fn selected(&self) -> Option<usize> {
        match self {
            AnswerRecord::Selected(i) => Some(*i),
            AnswerRecord::TimedOut => None,
        }
    }
}
