//! Session controller - fetch, play, report.
//!
//! Owns the current [`Session`] and everything needed to build the next one.
//! A failed fetch never touches the running session; reports go out at most
//! once per session and their failures are only logged.

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::QuizBackend;
use crate::core::{LevelSelector, QuizError, Randomizer, Session, SessionResult};
use crate::error::{BackendError, Result};
use crate::types::{Question, SessionKind, QUESTIONS_PER_SESSION};

/// Which report calls went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOutcome {
    pub level_progress: Option<bool>,
    pub chapter: Option<bool>,
    pub stats: bool,
}

pub struct SessionController {
    backend: Arc<dyn QuizBackend>,
    randomizer: Randomizer,
    selector: LevelSelector,
    question_count: usize,
    session: Option<Session>,
    reported: bool,
}

impl SessionController {
    pub fn new(backend: Arc<dyn QuizBackend>, randomizer: Randomizer) -> Self {
        Self {
            backend,
            randomizer,
            selector: LevelSelector::default(),
            question_count: QUESTIONS_PER_SESSION,
            session: None,
            reported: false,
        }
    }

    pub fn with_selector(mut self, selector: LevelSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Fetch and randomize a question set for `kind`.
    pub async fn prepare(&mut self, kind: &SessionKind) -> Result<Vec<Question>> {
        let pool = self.backend.fetch_questions(kind.category()).await?;
        let candidates = match kind {
            SessionKind::Challenge { .. } => pool,
            SessionKind::Level { level_sequence, .. } => {
                self.selector.select(&pool, *level_sequence)?
            }
        };
        if candidates.is_empty() {
            return Err(QuizError::EmptyPool {
                category: kind.category().to_string(),
            }
            .into());
        }
        Ok(self.randomizer.randomize(&candidates, self.question_count))
    }

    /// Start a new session of `kind`, replacing the current one on success.
    pub async fn start(&mut self, kind: SessionKind) -> Result<&mut Session> {
        let questions = match self.prepare(&kind).await {
            Ok(q) => q,
            Err(err) => {
                warn!(%err, category = kind.category(), "could not load questions");
                return Err(err);
            }
        };

        let mut session = match self.session.take() {
            Some(mut previous) if previous.kind() == &kind => {
                previous.abort();
                previous.replay(questions)
            }
            Some(mut previous) => {
                previous.abort();
                Session::new(kind, questions)
            }
            None => Session::new(kind, questions),
        };
        session.start();
        self.reported = false;
        Ok(self.session.insert(session))
    }

    /// Start over with the current session's kind and a fresh question set.
    pub async fn replay(&mut self) -> Result<&mut Session> {
        let kind = match &self.session {
            Some(s) => s.kind().clone(),
            None => return Err(BackendError::Unavailable("no session to replay".into())),
        };
        self.start(kind).await
    }

    /// Report the finished session to the backend.
    ///
    /// Returns `None` if there is nothing to report: no session, still
    /// running, left early, or already reported.
    pub async fn report(&mut self) -> Option<ReportOutcome> {
        if self.reported {
            return None;
        }
        let session = self.session.as_ref()?;
        let result = session.result()?;
        if !result.completed {
            return None;
        }
        self.reported = true;
        let kind = session.kind().clone();
        Some(self.send_reports(&kind, &result).await)
    }

    async fn send_reports(&self, kind: &SessionKind, result: &SessionResult) -> ReportOutcome {
        info!(
            score = result.score,
            stars = result.reward.stars,
            currency = result.reward.currency,
            "reporting session"
        );
        let mut outcome = ReportOutcome::default();

        if let SessionKind::Level {
            level_id,
            chapter_sequence,
            ..
        } = kind
        {
            let ok = self
                .backend
                .update_level_progress(level_id, result.score)
                .await
                .map_err(|err| warn!(%err, %level_id, "level progress update failed"))
                .is_ok();
            outcome.level_progress = Some(ok);

            let ok = self
                .backend
                .update_completed_chapter(*chapter_sequence, result.score, result.reward.currency)
                .await
                .map_err(|err| warn!(%err, chapter = chapter_sequence, "chapter update failed"))
                .is_ok();
            outcome.chapter = Some(ok);
        }

        outcome.stats = self
            .backend
            .update_question_stats(kind.category(), result.total, result.correct)
            .await
            .map_err(|err| warn!(%err, "question stats update failed"))
            .is_ok();

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryBackend, Report};
    use crate::types::{Phase, QuizOption, TICK_MS};

    fn pool(category: &str, n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    format!("{category}-{i}"),
                    category,
                    format!("Q{i}"),
                    vec![
                        QuizOption::new("A", "a"),
                        QuizOption::new("B", "b"),
                        QuizOption::new("C", "c"),
                    ],
                    "C",
                )
                .unwrap()
            })
            .collect()
    }

    fn challenge(category: &str) -> SessionKind {
        SessionKind::Challenge {
            category: category.into(),
        }
    }

    /// Answer every question correctly as soon as the options show.
    fn play_through(session: &mut Session) {
        while !session.ended() {
            if session.phase() == Phase::ShowOptions && !session.current_answered() {
                let correct = session.current_question().map(|q| q.correct).unwrap_or(0);
                session.select(correct);
            }
            session.tick(TICK_MS);
        }
    }

    #[tokio::test]
    async fn start_builds_ten_question_session() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("paper", 50)));
        let mut ctl = SessionController::new(backend, Randomizer::new(1));
        let session = ctl.start(challenge("paper")).await.unwrap();
        assert_eq!(session.questions().len(), 10);
        assert!(session.started());
    }

    #[tokio::test]
    async fn empty_pool_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ctl = SessionController::new(backend, Randomizer::new(1));
        let err = ctl.start(challenge("paper")).await.unwrap_err();
        assert!(err.to_string().contains("no questions"));
        assert!(ctl.session().is_none());
    }

    #[tokio::test]
    async fn failed_replay_keeps_previous_session() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("paper", 20)));
        let mut ctl = SessionController::new(backend.clone(), Randomizer::new(2));
        ctl.start(challenge("paper")).await.unwrap();
        let first_ids: Vec<_> = ctl
            .session()
            .unwrap()
            .questions()
            .iter()
            .map(|q| q.id.clone())
            .collect();

        backend.set_fail_fetch(true);
        assert!(ctl.replay().await.is_err());

        let session = ctl.session().unwrap();
        assert!(!session.ended());
        let ids: Vec<_> = session.questions().iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids, first_ids);
    }

    #[tokio::test]
    async fn replay_increments_episode() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("paper", 20)));
        let mut ctl = SessionController::new(backend, Randomizer::new(3));
        ctl.start(challenge("paper")).await.unwrap();
        let session = ctl.replay().await.unwrap();
        assert_eq!(session.episode_id(), 1);
        assert_eq!(session.score(), 0);
    }

    #[tokio::test]
    async fn level_uses_its_window() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("glass", 100)));
        let mut ctl = SessionController::new(backend, Randomizer::new(4));
        let kind = SessionKind::Level {
            level_id: "glass-2".into(),
            chapter_sequence: 1,
            level_sequence: 2,
            category: "glass".into(),
        };
        let session = ctl.start(kind).await.unwrap();
        for q in session.questions() {
            let n: usize = q.id.trim_start_matches("glass-").parse().unwrap();
            assert!((20..40).contains(&n), "question {n} outside level 2 window");
        }
    }

    #[tokio::test]
    async fn reports_once_after_completion() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("glass", 40)));
        let mut ctl = SessionController::new(backend.clone(), Randomizer::new(5));
        let kind = SessionKind::Level {
            level_id: "glass-1".into(),
            chapter_sequence: 3,
            level_sequence: 1,
            category: "glass".into(),
        };
        ctl.start(kind).await.unwrap();
        assert!(ctl.report().await.is_none());

        play_through(ctl.session_mut().unwrap());
        let outcome = ctl.report().await.unwrap();
        assert_eq!(outcome.level_progress, Some(true));
        assert_eq!(outcome.chapter, Some(true));
        assert!(outcome.stats);
        assert!(ctl.report().await.is_none());

        assert_eq!(
            backend.reports().await,
            vec![
                Report::LevelProgress {
                    level_id: "glass-1".into(),
                    score: 2000,
                },
                Report::ChapterCompleted {
                    chapter_sequence: 3,
                    score: 2000,
                    money: 100,
                },
                Report::QuestionStats {
                    category: "glass".into(),
                    total_answered: 10,
                    correct_count: 10,
                },
            ]
        );
    }

    #[tokio::test]
    async fn report_failures_are_swallowed() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("paper", 20)));
        let mut ctl = SessionController::new(backend.clone(), Randomizer::new(6));
        ctl.start(challenge("paper")).await.unwrap();
        play_through(ctl.session_mut().unwrap());

        backend.set_fail_reports(true);
        let outcome = ctl.report().await.unwrap();
        assert!(!outcome.stats);
        assert_eq!(outcome.level_progress, None);
        assert!(ctl.report().await.is_none());
    }

    #[tokio::test]
    async fn exited_session_is_not_reported() {
        let backend = Arc::new(MemoryBackend::with_questions(pool("paper", 20)));
        let mut ctl = SessionController::new(backend.clone(), Randomizer::new(7));
        let session = ctl.start(challenge("paper")).await.unwrap();
        session.request_exit();
        session.confirm_exit();
        assert!(ctl.report().await.is_none());
        assert!(backend.reports().await.is_empty());
    }
}
