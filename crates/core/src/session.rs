//! Session module - one play-through of a question set
//!
//! This module drives a question through its phases, runs the answer
//! countdown, scores answers and finalizes the session. All delayed work goes
//! through one [`TimerRegistry`]; [`Session::tick`] is the only thing that moves
//! time forward.

use tracing::{debug, info, warn};

use crate::reward::{points_for_answer, SessionResult};
use crate::snapshot::SessionSnapshot;
use crate::timers::{TimerEvent, TimerRegistry};
use crate::types::*;

/// Something observable that happened inside a session.
///
/// Queued in order and drained by observers with [`Session::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    PhaseEntered {
        question: usize,
        phase: Phase,
    },
    CountdownTick {
        question: usize,
        remaining: u8,
    },
    Answered {
        question: usize,
        record: AnswerRecord,
        correct: bool,
        points: u32,
    },
    ExitRequested,
    ExitCancelled,
    Ended {
        completed: bool,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    kind: SessionKind,
    questions: Vec<Question>,
    /// Index of the current question.
    index: usize,
    /// One slot per question; `None` until answered or timed out.
    answers: Vec<Option<AnswerRecord>>,
    /// Points awarded per question.
    points: Vec<u32>,
    score: u32,
    correct_count: u32,
    phase: Phase,
    countdown: u8,
    timers: TimerRegistry,
    /// Monotonic episode id (increments on replay).
    episode_id: u32,
    started: bool,
    ended: bool,
    completed: bool,
    exit_prompt: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Create a session over an already randomized question set.
    ///
    /// Questions failing [`Question::validate`] are dropped with a warning.
    pub fn new(kind: SessionKind, mut questions: Vec<Question>) -> Self {
        questions.retain(|q| match q.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(question = %q.id, %err, "dropping invalid question");
                false
            }
        });
        let n = questions.len();
        Self {
            kind,
            questions,
            index: 0,
            answers: vec![None; n],
            points: vec![0; n],
            score: 0,
            correct_count: 0,
            phase: Phase::ShowInfo,
            countdown: COUNTDOWN_SECS,
            timers: TimerRegistry::new(),
            episode_id: 0,
            started: false,
            ended: false,
            completed: false,
            exit_prompt: false,
            events: Vec::new(),
        }
    }

    /// Build the next episode over a fresh question set.
    ///
    /// Nothing carries over except the episode counter; the old session and its
    /// timers are meant to be dropped.
    pub fn replay(&self, questions: Vec<Question>) -> Self {
        let mut next = Self::new(self.kind.clone(), questions);
        next.episode_id = self.episode_id.wrapping_add(1);
        next
    }

    /// Start the first question. A session with no questions ends immediately.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            episode = self.episode_id,
            category = self.kind.category(),
            questions = self.questions.len(),
            "session started"
        );

        if self.questions.is_empty() {
            self.finish(false);
            return;
        }
        self.enter_question(0);
    }

    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn answer_for(&self, question: usize) -> Option<AnswerRecord> {
        self.answers.get(question).copied().flatten()
    }

    pub fn points_for(&self, question: usize) -> u32 {
        self.points.get(question).copied().unwrap_or(0)
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn exit_prompt(&self) -> bool {
        self.exit_prompt
    }

    /// Virtual time since the session started.
    pub fn elapsed_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Whether the current question has already been answered or timed out.
    pub fn current_answered(&self) -> bool {
        self.answer_for(self.index).is_some()
    }

    /// Final result, available once the session ended.
    pub fn result(&self) -> Option<SessionResult> {
        if !self.ended {
            return None;
        }
        let answered = self
            .answers
            .iter()
            .filter(|a| matches!(a, Some(AnswerRecord::Selected(_))))
            .count() as u32;
        Some(SessionResult::new(
            self.score,
            self.correct_count,
            answered,
            self.questions.len() as u32,
            self.completed,
        ))
    }

    /// Take all queued events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.episode_id = self.episode_id;
        out.category.clear();
        out.category.push_str(self.kind.category());
        out.challenge = self.kind.is_challenge();
        out.phase = self.phase;
        out.question_number = self.index + 1;
        out.total = self.questions.len();
        out.score = self.score;
        out.countdown = self.countdown;
        out.exit_prompt = self.exit_prompt;
        out.ended = self.ended;
        out.answer = self.answer_for(self.index);
        out.points = self.points_for(self.index);
        out.next_timer_ms = self.timers.next_due_in();
        out.result = self.result();

        out.content.clear();
        out.options.clear();
        out.correct = None;
        if let Some(q) = self.current_question() {
            out.content.push_str(&q.content);
            out.options.extend(q.options.iter().map(|o| o.text.clone()));
            if out.answer.is_some() {
                out.correct = Some(q.correct);
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Main session tick - advance the virtual clock and fire due timers.
    ///
    /// Returns whether any timer fired. Does nothing before start, after the
    /// end, or while an exit confirmation is pending.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started || self.ended || self.exit_prompt {
            return false;
        }

        let deadline = self.timers.deadline_after(elapsed_ms);
        let mut fired = false;
        while let Some(event) = self.timers.pop_due(deadline) {
            fired = true;
            self.on_timer(event);
            if self.ended {
                // The clock stops where the session ended.
                return true;
            }
        }
        self.timers.settle(deadline);
        fired
    }

    /// Apply a player action.
    ///
    /// `Replay` needs a new question set and is handled by the owner via
    /// [`Session::replay`]; here it returns `false`.
    pub fn apply_action(&mut self, action: QuizAction) -> bool {
        match action {
            QuizAction::Select(i) => self.select(i),
            QuizAction::Exit => self.request_exit(),
            QuizAction::ConfirmExit => self.confirm_exit(),
            QuizAction::CancelExit => self.cancel_exit(),
            QuizAction::Replay => false,
        }
    }

    /// Answer the current question with option `option`.
    ///
    /// Returns `false` (and changes nothing) if the session ended, the options
    /// are not showing, the question was already answered, the exit prompt is
    /// up, or `option` is out of range.
    pub fn select(&mut self, option: usize) -> bool {
        self.answer(Some(option))
    }

    /// Ask to leave. During play this raises a confirmation and freezes timers.
    pub fn request_exit(&mut self) -> bool {
        if self.ended {
            return false;
        }
        if !self.started {
            self.started = true;
            self.finish(false);
            return true;
        }
        if self.exit_prompt {
            return false;
        }
        self.exit_prompt = true;
        self.events.push(SessionEvent::ExitRequested);
        debug!(question = self.index, "exit requested");
        true
    }

    /// Commit a pending exit: the session ends without completing.
    pub fn confirm_exit(&mut self) -> bool {
        if !self.exit_prompt {
            return false;
        }
        self.exit_prompt = false;
        self.finish(false);
        true
    }

    pub fn cancel_exit(&mut self) -> bool {
        if !self.exit_prompt {
            return false;
        }
        self.exit_prompt = false;
        self.events.push(SessionEvent::ExitCancelled);
        true
    }

    /// End the session immediately, no confirmation (teardown).
    pub fn abort(&mut self) {
        self.started = true;
        self.exit_prompt = false;
        self.finish(false);
    }

    fn enter_question(&mut self, index: usize) {
        self.index = index;
        self.countdown = COUNTDOWN_SECS;
        self.set_phase(Phase::ShowInfo);
        self.timers.schedule(INFO_PHASE_MS, TimerEvent::AdvancePhase);
    }

    fn on_timer(&mut self, event: TimerEvent) {
        if self.ended {
            return;
        }
        match event {
            TimerEvent::AdvancePhase => match self.phase {
                Phase::ShowInfo => {
                    self.set_phase(Phase::ShowQuestion);
                    self.timers.schedule(QUESTION_PHASE_MS, TimerEvent::AdvancePhase);
                }
                Phase::ShowQuestion => {
                    self.countdown = COUNTDOWN_SECS;
                    self.set_phase(Phase::ShowOptions);
                    self.timers.schedule(COUNTDOWN_TICK_MS, TimerEvent::CountdownTick);
                }
                other => debug!(phase = %other, "stale phase advance ignored"),
            },
            TimerEvent::CountdownTick => {
                if self.phase != Phase::ShowOptions || self.current_answered() {
                    return;
                }
                self.countdown = self.countdown.saturating_sub(1);
                self.events.push(SessionEvent::CountdownTick {
                    question: self.index,
                    remaining: self.countdown,
                });
                if self.countdown == 0 {
                    self.answer(None);
                } else {
                    self.timers.schedule(COUNTDOWN_TICK_MS, TimerEvent::CountdownTick);
                }
            }
            TimerEvent::FinishQuestion => {
                if self.index + 1 >= self.questions.len() {
                    self.finish(true);
                } else {
                    self.set_phase(Phase::Transitioning);
                    self.timers.schedule(TRANSITION_MS, TimerEvent::BeginNextQuestion);
                }
            }
            TimerEvent::BeginNextQuestion => {
                if self.phase == Phase::Transitioning {
                    self.enter_question(self.index + 1);
                }
            }
        }
    }

    /// Record the answer for the current question; `None` is a timeout.
    fn answer(&mut self, selection: Option<usize>) -> bool {
        if self.ended || self.exit_prompt || self.phase != Phase::ShowOptions {
            return false;
        }
        if self.current_answered() {
            return false;
        }
        let Some(question) = self.questions.get(self.index) else {
            return false;
        };
        if let Some(i) = selection {
            if i >= question.options.len() {
                return false;
            }
        }

        let correct = selection == Some(question.correct);
        let points = points_for_answer(correct, self.countdown);
        let record = match selection {
            Some(i) => AnswerRecord::Selected(i),
            None => AnswerRecord::TimedOut,
        };

        self.answers[self.index] = Some(record);
        self.points[self.index] = points;
        self.score += points;
        if correct {
            self.correct_count += 1;
        }
        self.events.push(SessionEvent::Answered {
            question: self.index,
            record,
            correct,
            points,
        });
        debug!(question = self.index, ?record, correct, points, "answered");

        self.timers.cancel_event(TimerEvent::CountdownTick);
        self.timers.schedule(ANSWER_REVEAL_MS, TimerEvent::FinishQuestion);
        true
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.events.push(SessionEvent::PhaseEntered {
            question: self.index,
            phase,
        });
        debug!(question = self.index, phase = %phase, "phase entered");
    }

    fn finish(&mut self, completed: bool) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.completed = completed;
        self.timers.close();
        self.set_phase(Phase::GameEnded);
        self.events.push(SessionEvent::Ended { completed });
        info!(
            episode = self.episode_id,
            score = self.score,
            correct = self.correct_count,
            completed,
            "session ended"
        );
    }
}
