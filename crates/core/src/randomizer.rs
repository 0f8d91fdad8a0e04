//! Randomizer module - question sampling and option shuffling
//!
//! A session draws its questions by Fisher-Yates shuffling the whole category
//! pool and keeping the first `count`. Each drawn question then gets its options
//! shuffled; the correct index is recomputed by option id afterwards.
//!
//! [`Randomizer`] owns a seedable RNG so a whole play-through can be replayed
//! from a seed (tests, `ECOQUIZ_SEED`). The free functions accept any
//! [`rand::Rng`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, warn};

use crate::error::{QuizError, Result};
use crate::types::Question;

/// Pick `count` distinct questions from `pool` in random order.
///
/// The pool is shuffled as a whole and truncated, so no question is picked
/// twice. A pool smaller than `count` is returned whole (shuffled).
pub fn select_questions<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut picked = pool.to_vec();
    picked.shuffle(rng);
    picked.truncate(count);
    picked
}

/// Shuffle the options of `question` in place and re-resolve the correct index.
///
/// A question that fails [`Question::validate`] is left untouched and
/// reported as [`QuizError::InvalidQuestion`]. The correct option is looked
/// up by id after the shuffle; if it cannot be found the original order is
/// restored and [`QuizError::CorrectOptionLost`] is returned (debug builds
/// panic instead).
pub fn shuffle_options<R: Rng + ?Sized>(question: &mut Question, rng: &mut R) -> Result<()> {
    let correct_id = match question.validate() {
        // In range once validated.
        Ok(()) => question.options[question.correct].id.clone(),
        Err(source) => {
            error!(question = %question.id, %source, "refusing to shuffle invalid question");
            return Err(QuizError::InvalidQuestion {
                id: question.id.clone(),
                source,
            });
        }
    };
    let original = question.options.clone();

    question.options.shuffle(rng);

    match question.option_index(&correct_id) {
        Some(idx) => {
            question.correct = idx;
            Ok(())
        }
        None => {
            debug_assert!(
                false,
                "question {} lost correct option {} while shuffling",
                question.id, correct_id
            );
            error!(
                question = %question.id,
                option = %correct_id,
                "correct option lost while shuffling"
            );
            question.options = original;
            Err(QuizError::CorrectOptionLost {
                id: question.id.clone(),
                option_id: correct_id,
            })
        }
    }
}

/// Select `count` questions and shuffle the options of each.
///
/// Questions that fail validation are dropped before the draw, so the result
/// only holds answerable questions. A question whose shuffle fails keeps its
/// original option order.
pub fn randomize<R: Rng + ?Sized>(pool: &[Question], count: usize, rng: &mut R) -> Vec<Question> {
    let mut picked: Vec<Question> = pool
        .iter()
        .filter(|q| match q.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(question = %q.id, %err, "dropping invalid question");
                false
            }
        })
        .cloned()
        .collect();
    picked.shuffle(rng);
    picked.truncate(count);

    for question in &mut picked {
        // The error is already logged and the question left answerable.
        let _ = shuffle_options(question, rng);
    }
    debug!(pool = pool.len(), picked = picked.len(), "randomized question set");
    picked
}

/// Seedable question randomizer.
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: StdRng,
    seed: Option<u64>,
}

impl Randomizer {
    /// Create a randomizer with a fixed seed (same seed, same draws).
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a randomizer seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this randomizer was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn select(&mut self, pool: &[Question], count: usize) -> Vec<Question> {
        select_questions(pool, count, &mut self.rng)
    }

    pub fn shuffle_options(&mut self, question: &mut Question) -> Result<()> {
        shuffle_options(question, &mut self.rng)
    }

    pub fn randomize(&mut self, pool: &[Question], count: usize) -> Vec<Question> {
        randomize(pool, count, &mut self.rng)
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::from_entropy()
    }
}
