use crate::reward::SessionResult;
use crate::types::{AnswerRecord, Phase, COUNTDOWN_SECS};

/// Plain-data view of a session for rendering and logging.
///
/// `correct` stays `None` until the current question is answered so a view
/// cannot leak the answer early.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub episode_id: u32,
    pub category: String,
    pub challenge: bool,
    pub phase: Phase,
    /// One-based.
    pub question_number: usize,
    pub total: usize,
    pub content: String,
    pub options: Vec<String>,
    pub correct: Option<usize>,
    pub answer: Option<AnswerRecord>,
    /// Points earned on the current question.
    pub points: u32,
    pub score: u32,
    pub countdown: u8,
    pub exit_prompt: bool,
    pub ended: bool,
    pub next_timer_ms: Option<u64>,
    pub result: Option<SessionResult>,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.episode_id = 0;
        self.category.clear();
        self.challenge = false;
        self.phase = Phase::ShowInfo;
        self.question_number = 0;
        self.total = 0;
        self.content.clear();
        self.options.clear();
        self.correct = None;
        self.answer = None;
        self.points = 0;
        self.score = 0;
        self.countdown = COUNTDOWN_SECS;
        self.exit_prompt = false;
        self.ended = false;
        self.next_timer_ms = None;
        self.result = None;
    }

    /// Whether the player can pick an option right now.
    pub fn accepts_answer(&self) -> bool {
        self.phase == Phase::ShowOptions
            && self.answer.is_none()
            && !self.exit_prompt
            && !self.ended
    }

    /// Whether the question text should be on screen.
    pub fn shows_question(&self) -> bool {
        matches!(self.phase, Phase::ShowQuestion | Phase::ShowOptions)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            episode_id: 0,
            category: String::new(),
            challenge: false,
            phase: Phase::ShowInfo,
            question_number: 0,
            total: 0,
            content: String::new(),
            options: Vec::new(),
            correct: None,
            answer: None,
            points: 0,
            score: 0,
            countdown: COUNTDOWN_SECS,
            exit_prompt: false,
            ended: false,
            next_timer_ms: None,
            result: None,
        }
    }
}
