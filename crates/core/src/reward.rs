//! Reward module - per-answer points and end-of-session rewards
//!
//! Compatibility note:
//! The star thresholds are deliberately uneven (600 / 1000 / 1600) and must be
//! kept as-is; progress already stored by the backend was earned under them.

use crate::types::{
    COUNTDOWN_SECS, CURRENCY_PER_STEP, MAX_POINTS_PER_QUESTION, POINTS_LOST_PER_SECOND,
    POINTS_PER_CURRENCY_STEP, STAR_THRESHOLDS,
};

/// Stars and currency earned by a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reward {
    pub stars: u8,
    pub currency: u32,
}

/// Points for one answer.
///
/// `countdown_remaining` is the countdown value when the answer landed.
/// Correct answers earn `200 - elapsed_secs * 25`, floored at zero.
pub fn points_for_answer(correct: bool, countdown_remaining: u8) -> u32 {
    if !correct {
        return 0;
    }
    let elapsed = COUNTDOWN_SECS.saturating_sub(countdown_remaining) as u32;
    MAX_POINTS_PER_QUESTION.saturating_sub(elapsed * POINTS_LOST_PER_SECOND)
}

/// Star rating (0-3) for a final score.
pub fn stars_for(score: u32) -> u8 {
    STAR_THRESHOLDS.iter().filter(|&&t| score >= t).count() as u8
}

/// Currency for a final score: `floor(score / 200) * 10`.
pub fn currency_for(score: u32) -> u32 {
    (score / POINTS_PER_CURRENCY_STEP) * CURRENCY_PER_STEP
}

pub fn reward_for(score: u32) -> Reward {
    Reward {
        stars: stars_for(score),
        currency: currency_for(score),
    }
}

/// Final outcome of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub score: u32,
    /// Correctly answered questions.
    pub correct: u32,
    /// Questions that got a selection (timeouts excluded).
    pub answered: u32,
    /// Questions in the session.
    pub total: u32,
    pub reward: Reward,
    /// False when the player left before the last question.
    pub completed: bool,
}

impl SessionResult {
    pub fn new(score: u32, correct: u32, answered: u32, total: u32, completed: bool) -> Self {
        Self {
            score,
            correct,
            answered,
            total,
            reward: reward_for(score),
            completed,
        }
    }

    /// Share of questions answered correctly, 0.0-1.0.
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f32 / self.total as f32
    }
}
