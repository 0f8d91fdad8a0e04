//! Runtime configuration from environment variables.

use std::path::PathBuf;

use crate::types::SessionKind;

/// REST endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Questions are fetched from `<base>/<question_path>/<category>`.
    pub question_path: String,
    pub level_progress_path: String,
    pub chapter_progress_path: String,
    pub question_stats_path: String,
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            token: None,
            question_path: "questions".to_string(),
            level_progress_path: "progress/level".to_string(),
            chapter_progress_path: "progress/chapter".to_string(),
            question_stats_path: "questions/stats".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Where questions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    Http(BackendConfig),
    /// JSON file in the backend wire format.
    File(PathBuf),
}

/// Complete front-end configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub source: QuestionSource,
    pub kind: SessionKind,
    pub seed: Option<u64>,
    pub log_filter: String,
    pub log_dir: PathBuf,
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl BackendConfig {
    /// Read `ECOQUIZ_API_*` variables over the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: non_empty("ECOQUIZ_API_BASE").unwrap_or(defaults.base_url),
            token: non_empty("ECOQUIZ_API_TOKEN"),
            question_path: non_empty("ECOQUIZ_QUESTION_PATH").unwrap_or(defaults.question_path),
            timeout_ms: non_empty("ECOQUIZ_API_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_ms),
            ..defaults
        }
    }
}

impl QuizConfig {
    /// Build from environment variables.
    ///
    /// Level mode is selected when `ECOQUIZ_LEVEL` is set; otherwise the
    /// session is a challenge over `ECOQUIZ_CATEGORY`.
    pub fn from_env() -> Self {
        let source = match non_empty("ECOQUIZ_QUESTIONS_FILE") {
            Some(path) => QuestionSource::File(PathBuf::from(path)),
            None => QuestionSource::Http(BackendConfig::from_env()),
        };

        let category = non_empty("ECOQUIZ_CATEGORY").unwrap_or_else(|| "paper".to_string());
        let level = non_empty("ECOQUIZ_LEVEL").and_then(|s| s.parse::<u32>().ok());
        let kind = match level {
            Some(level_sequence) => SessionKind::Level {
                level_id: non_empty("ECOQUIZ_LEVEL_ID")
                    .unwrap_or_else(|| format!("{category}-{level_sequence}")),
                chapter_sequence: non_empty("ECOQUIZ_CHAPTER")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
                level_sequence,
                category,
            },
            None => SessionKind::Challenge { category },
        };

        Self {
            source,
            kind,
            seed: non_empty("ECOQUIZ_SEED").and_then(|s| s.parse().ok()),
            log_filter: non_empty("ECOQUIZ_LOG").unwrap_or_else(|| "info".to_string()),
            log_dir: non_empty("ECOQUIZ_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
        }
    }
}
