//! Core quiz logic module - pure, deterministic, and testable
//!
//! This module contains the question randomizer, the session state machine and
//! the reward rules. It has **no dependencies** on UI, networking, or I/O:
//!
//! - **Deterministic**: a seeded [`Randomizer`] plus a virtual clock means the
//!   same seed and the same inputs replay the same session
//! - **Testable**: timers only move when [`Session::tick`] is called
//! - **Portable**: runs in the terminal front end, headless drivers and tests
//!
//! # Module Structure
//!
//! - [`randomizer`]: Fisher-Yates question sampling and option shuffling
//! - [`level`]: level → question window mapping for chapter play
//! - [`timers`]: cancellable timer registry on a virtual clock
//! - [`session`]: phase machine, countdown and scoring for one play-through
//! - [`reward`]: per-answer points, stars and currency
//! - [`snapshot`]: plain-data session view for renderers
//!
//! # Session Rules
//!
//! - 10 questions, sampled without replacement, options shuffled
//! - Each question runs `show-info` (1.5s) → `show-question` (1s) →
//!   `show-options` (8s countdown) → `transitioning` → next question
//! - Correct answers earn `200 - elapsed_secs * 25`, wrong ones and timeouts 0
//! - One answer per question; later clicks are ignored
//!
//! # Example
//!
//! ```
//! use eco_quiz_core::{Randomizer, Session};
//! use eco_quiz_types::{
//!     Phase, Question, QuizOption, SessionKind, INFO_PHASE_MS, QUESTION_PHASE_MS,
//! };
//!
//! let pool: Vec<Question> = (0..20)
//!     .map(|i| {
//!         Question::new(
//!             format!("q{i}"),
//!             "paper",
//!             "Is cardboard recyclable?",
//!             vec![QuizOption::new("A", "Yes"), QuizOption::new("B", "No")],
//!             "A",
//!         )
//!         .unwrap()
//!     })
//!     .collect();
//!
//! let questions = Randomizer::new(7).randomize(&pool, 10);
//! let mut session = Session::new(SessionKind::Challenge { category: "paper".into() }, questions);
//! session.start();
//!
//! session.tick(INFO_PHASE_MS + QUESTION_PHASE_MS);
//! assert_eq!(session.phase(), Phase::ShowOptions);
//!
//! let correct = session.current_question().unwrap().correct;
//! session.select(correct);
//! assert_eq!(session.score(), 200);
//! ```

pub mod error;
pub mod level;
pub mod randomizer;
pub mod reward;
pub mod session;
pub mod snapshot;
pub mod timers;

pub use eco_quiz_types as types;

// Re-export commonly used types for convenience
pub use error::{QuizError, Result};
pub use level::{LevelLayout, LevelQuestionMap, LevelSelector};
pub use randomizer::{randomize, select_questions, shuffle_options, Randomizer};
pub use reward::{points_for_answer, reward_for, Reward, SessionResult};
pub use session::{Session, SessionEvent};
pub use snapshot::SessionSnapshot;
pub use timers::{TimerEvent, TimerId, TimerRegistry};
