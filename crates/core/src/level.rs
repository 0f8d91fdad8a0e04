//! Level module - maps a chapter level onto its slice of questions
//!
//! The backend returns a chapter's questions as one flat, ordered list. Level
//! `n` owns a fixed-size window of it; the window shape is configuration here
//! rather than arithmetic baked into the caller, and an explicit
//! level → question-id table can replace it entirely.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{QuizError, Result};
use crate::types::{Question, LEVELS_PER_CHAPTER, QUESTIONS_PER_LEVEL};

/// Shape of the flat question list: fixed-size windows, cycling per chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLayout {
    pub questions_per_level: usize,
    pub levels_per_chapter: usize,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            questions_per_level: QUESTIONS_PER_LEVEL,
            levels_per_chapter: LEVELS_PER_CHAPTER,
        }
    }
}

impl LevelLayout {
    pub fn new(questions_per_level: usize, levels_per_chapter: usize) -> Self {
        Self {
            questions_per_level,
            levels_per_chapter,
        }
    }

    /// Window of the flat list owned by `level_sequence` (one-based).
    ///
    /// Starts at `((level_sequence - 1) % levels_per_chapter) * questions_per_level`.
    pub fn window(&self, level_sequence: u32) -> Result<Range<usize>> {
        if level_sequence == 0 || self.levels_per_chapter == 0 || self.questions_per_level == 0 {
            return Err(QuizError::InvalidLevel { level_sequence });
        }
        let slot = (level_sequence as usize - 1) % self.levels_per_chapter;
        let start = slot * self.questions_per_level;
        Ok(start..start + self.questions_per_level)
    }

    /// The level's questions, with the window clamped to the pool.
    pub fn slice<'a>(&self, pool: &'a [Question], level_sequence: u32) -> Result<&'a [Question]> {
        let window = self.window(level_sequence)?;
        let start = window.start.min(pool.len());
        let end = window.end.min(pool.len());
        Ok(&pool[start..end])
    }
}

/// Explicit level → question ids table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelQuestionMap {
    levels: HashMap<u32, Vec<String>>,
}

impl LevelQuestionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level_sequence: u32, question_ids: Vec<String>) {
        self.levels.insert(level_sequence, question_ids);
    }

    pub fn with_level(mut self, level_sequence: u32, question_ids: Vec<String>) -> Self {
        self.insert(level_sequence, question_ids);
        self
    }

    /// Questions listed for the level, in table order. Unknown ids are skipped.
    pub fn select(&self, pool: &[Question], level_sequence: u32) -> Result<Vec<Question>> {
        let ids = self
            .levels
            .get(&level_sequence)
            .ok_or(QuizError::InvalidLevel { level_sequence })?;

        Ok(ids
            .iter()
            .filter_map(|id| pool.iter().find(|q| &q.id == id))
            .cloned()
            .collect())
    }
}

/// How a level's questions are carved out of the chapter pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSelector {
    Window(LevelLayout),
    Explicit(LevelQuestionMap),
}

impl Default for LevelSelector {
    fn default() -> Self {
        LevelSelector::Window(LevelLayout::default())
    }
}

impl LevelSelector {
    pub fn select(&self, pool: &[Question], level_sequence: u32) -> Result<Vec<Question>> {
        match self {
            LevelSelector::Window(layout) => Ok(layout.slice(pool, level_sequence)?.to_vec()),
            LevelSelector::Explicit(map) => map.select(pool, level_sequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuizOption;

    fn pool(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    "glass",
                    "?",
                    vec![QuizOption::new("A", "yes"), QuizOption::new("B", "no")],
                    "A",
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_default_windows() {
        let layout = LevelLayout::default();
        assert_eq!(layout.window(1).unwrap(), 0..20);
        assert_eq!(layout.window(2).unwrap(), 20..40);
        assert_eq!(layout.window(5).unwrap(), 80..100);
        // Sixth level wraps to the first slot of the next chapter.
        assert_eq!(layout.window(6).unwrap(), 0..20);
        assert_eq!(layout.window(7).unwrap(), 20..40);
    }

    #[test]
    fn test_level_zero_rejected() {
        let layout = LevelLayout::default();
        assert_eq!(
            layout.window(0),
            Err(QuizError::InvalidLevel { level_sequence: 0 })
        );
    }

    #[test]
    fn test_slice_clamps_to_pool() {
        let pool = pool(50);
        let layout = LevelLayout::default();
        assert_eq!(layout.slice(&pool, 2).unwrap().len(), 20);
        assert_eq!(layout.slice(&pool, 3).unwrap().len(), 10);
        assert!(layout.slice(&pool, 4).unwrap().is_empty());
        assert_eq!(layout.slice(&pool, 2).unwrap()[0].id, "q20");
    }

    #[test]
    fn test_custom_layout() {
        let pool = pool(30);
        let layout = LevelLayout::new(10, 3);
        assert_eq!(layout.slice(&pool, 3).unwrap()[0].id, "q20");
        assert_eq!(layout.slice(&pool, 4).unwrap()[0].id, "q0");
    }

    #[test]
    fn test_explicit_map() {
        let pool = pool(10);
        let map = LevelQuestionMap::new().with_level(
            1,
            vec!["q3".into(), "missing".into(), "q7".into()],
        );
        let selector = LevelSelector::Explicit(map);

        let picked = selector.select(&pool, 1).unwrap();
        let ids: Vec<_> = picked.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q3", "q7"]);

        assert_eq!(
            selector.select(&pool, 2),
            Err(QuizError::InvalidLevel { level_sequence: 2 })
        );
    }
}
