//! Backend trait and the HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::dto::{
    questions_from_dtos, ChapterCompletionBody, LevelProgressBody, QuestionDto, QuestionStatsBody,
};
use crate::error::{BackendError, Result};
use crate::types::Question;

/// The calls a quiz session makes against the outside world.
///
/// Fetches gate a session start; the three report calls are fired once at the
/// end of a completed session and are best-effort.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Full question pool for a category (or a chapter's flat list).
    async fn fetch_questions(&self, category: &str) -> Result<Vec<Question>>;

    async fn update_level_progress(&self, level_id: &str, score: u32) -> Result<()>;

    async fn update_completed_chapter(
        &self,
        chapter_sequence: u32,
        score: u32,
        money: u32,
    ) -> Result<()>;

    async fn update_question_stats(
        &self,
        category: &str,
        total_answered: u32,
        correct_count: u32,
    ) -> Result<()>;
}

/// JSON-over-HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Join the base URL and a path with exactly one slash.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn post_json<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<()> {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::Status {
                method: "POST",
                url,
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl QuizBackend for HttpBackend {
    async fn fetch_questions(&self, category: &str) -> Result<Vec<Question>> {
        let url = self.url(&format!("{}/{}", self.config.question_path, category));
        let resp = self.authorize(self.client.get(&url)).send().await?;
        if !resp.status().is_success() {
            return Err(BackendError::Status {
                method: "GET",
                url,
                status: resp.status().as_u16(),
            });
        }
        let bytes = resp.bytes().await?;
        let dtos: Vec<QuestionDto> = serde_json::from_slice(&bytes)?;
        let fetched = dtos.len();
        let questions = questions_from_dtos(dtos);
        info!(category, fetched, usable = questions.len(), "fetched questions");
        Ok(questions)
    }

    async fn update_level_progress(&self, level_id: &str, score: u32) -> Result<()> {
        let body = LevelProgressBody {
            level_id: level_id.to_string(),
            score,
        };
        self.post_json(&self.config.level_progress_path, &body).await
    }

    async fn update_completed_chapter(
        &self,
        chapter_sequence: u32,
        score: u32,
        money: u32,
    ) -> Result<()> {
        let body = ChapterCompletionBody {
            chapter_sequence,
            score,
            money,
        };
        self.post_json(&self.config.chapter_progress_path, &body).await
    }

    async fn update_question_stats(
        &self,
        category: &str,
        total_answered: u32,
        correct_count: u32,
    ) -> Result<()> {
        let body = QuestionStatsBody {
            category: category.to_string(),
            total_answered,
            correct_count,
        };
        self.post_json(&self.config.question_stats_path, &body).await
    }
}
