//! Timer registry - every delayed callback of a session in one place
//!
//! The session never sleeps. Phase advances and countdown ticks are scheduled
//! here against a virtual clock that only moves when the owner calls
//! [`TimerRegistry::pop_due`] / [`TimerRegistry::settle`] from its tick.
//!
//! Once [`TimerRegistry::close`] runs, scheduling is refused and nothing fires,
//! so a torn-down session cannot be mutated by a stale timer.

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// show-info -> show-question -> show-options
    AdvancePhase,
    /// One countdown second elapsed
    CountdownTick,
    /// Reveal over, leave the current question
    FinishQuestion,
    /// Transition over, show the next question
    BeginNextQuestion,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    id: TimerId,
    due_ms: u64,
    event: TimerEvent,
}

/// Cancellable one-shot timers on a virtual millisecond clock.
#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Scheduled>,
    closed: bool,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether a timer for `event` is waiting.
    pub fn is_scheduled(&self, event: TimerEvent) -> bool {
        self.pending.iter().any(|s| s.event == event)
    }

    /// Schedule `event` to fire `delay_ms` from now.
    ///
    /// Returns `None` once the registry is closed.
    pub fn schedule(&mut self, delay_ms: u32, event: TimerEvent) -> Option<TimerId> {
        if self.closed {
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: self.now_ms + delay_ms as u64,
            event,
        });
        Some(id)
    }

    /// Cancel one timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending timer for `event`.
    pub fn cancel_event(&mut self, event: TimerEvent) {
        self.pending.retain(|s| s.event != event);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Cancel everything and refuse further scheduling. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
    }

    /// Deadline `elapsed_ms` after the current time.
    pub fn deadline_after(&self, elapsed_ms: u32) -> u64 {
        self.now_ms + elapsed_ms as u64
    }

    /// Remove and return the earliest timer due at or before `deadline`.
    ///
    /// The clock moves to that timer's due time, so anything the caller
    /// schedules in response is measured from when the timer fired, not from
    /// the end of the tick. Ties fire in scheduling order.
    pub fn pop_due(&mut self, deadline: u64) -> Option<TimerEvent> {
        if self.closed {
            return None;
        }
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= deadline)
            .min_by_key(|(_, s)| (s.due_ms, s.id))?;

        let fired = self.pending.remove(pos);
        self.now_ms = self.now_ms.max(fired.due_ms);
        Some(fired.event)
    }

    /// Move the clock to `deadline` once all due timers were popped.
    pub fn settle(&mut self, deadline: u64) {
        self.now_ms = self.now_ms.max(deadline);
    }

    /// Advance by `elapsed_ms`, pushing every timer due in that window onto
    /// `out` in firing order.
    ///
    /// Timers scheduled while handling these events are not included; callers
    /// that need cascades use [`TimerRegistry::pop_due`] directly.
    pub fn advance(&mut self, elapsed_ms: u32, out: &mut Vec<TimerEvent>) {
        let deadline = self.deadline_after(elapsed_ms);
        while let Some(event) = self.pop_due(deadline) {
            out.push(event);
        }
        self.settle(deadline);
    }

    /// Milliseconds until the next timer fires.
    pub fn next_due_in(&self) -> Option<u64> {
        self.pending
            .iter()
            .map(|s| s.due_ms.saturating_sub(self.now_ms))
            .min()
    }
}
