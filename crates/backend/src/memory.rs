//! In-process backend: fixed question pools and a log of reports.
//!
//! Used for offline play from a JSON file and as the test double for the
//! controller.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::client::QuizBackend;
use crate::dto::{questions_from_dtos, QuestionDto};
use crate::error::{BackendError, Result};
use crate::types::Question;

/// A report call as received by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    LevelProgress {
        level_id: String,
        score: u32,
    },
    ChapterCompleted {
        chapter_sequence: u32,
        score: u32,
        money: u32,
    },
    QuestionStats {
        category: String,
        total_answered: u32,
        correct_count: u32,
    },
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    pools: RwLock<HashMap<String, Vec<Question>>>,
    reports: RwLock<Vec<Report>>,
    fail_fetch: AtomicBool,
    fail_reports: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from questions, grouped by their category.
    pub fn with_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut pools: HashMap<String, Vec<Question>> = HashMap::new();
        for q in questions {
            pools.entry(q.category.clone()).or_default().push(q);
        }
        Self {
            pools: RwLock::new(pools),
            ..Self::default()
        }
    }

    /// Load a JSON array in the backend wire format.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await?;
        let dtos: Vec<QuestionDto> = serde_json::from_slice(&raw)?;
        let questions = questions_from_dtos(dtos);
        info!(path = %path.display(), questions = questions.len(), "loaded question file");
        Ok(Self::with_questions(questions))
    }

    pub async fn set_pool(&self, category: &str, questions: Vec<Question>) {
        self.pools.write().await.insert(category.to_string(), questions);
    }

    /// Make subsequent fetches fail.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent report calls fail.
    pub fn set_fail_reports(&self, fail: bool) {
        self.fail_reports.store(fail, Ordering::SeqCst);
    }

    pub async fn reports(&self) -> Vec<Report> {
        self.reports.read().await.clone()
    }

    async fn record(&self, report: Report) -> Result<()> {
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("reports disabled".into()));
        }
        self.reports.write().await.push(report);
        Ok(())
    }
}

#[async_trait]
impl QuizBackend for MemoryBackend {
    async fn fetch_questions(&self, category: &str) -> Result<Vec<Question>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("fetch disabled".into()));
        }
        Ok(self
            .pools
            .read()
            .await
            .get(category)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_level_progress(&self, level_id: &str, score: u32) -> Result<()> {
        self.record(Report::LevelProgress {
            level_id: level_id.to_string(),
            score,
        })
        .await
    }

    async fn update_completed_chapter(
        &self,
        chapter_sequence: u32,
        score: u32,
        money: u32,
    ) -> Result<()> {
        self.record(Report::ChapterCompleted {
            chapter_sequence,
            score,
            money,
        })
        .await
    }

    async fn update_question_stats(
        &self,
        category: &str,
        total_answered: u32,
        correct_count: u32,
    ) -> Result<()> {
        self.record(Report::QuestionStats {
            category: category.to_string(),
            total_answered,
            correct_count,
        })
        .await
    }
}
