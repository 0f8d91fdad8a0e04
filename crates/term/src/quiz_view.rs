//! QuizView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{option_label, AnswerRecord, Phase, COUNTDOWN_SECS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(130, 130, 140);
const ACCENT: Rgb = Rgb::new(110, 200, 140);
const GOOD: Rgb = Rgb::new(90, 210, 110);
const BAD: Rgb = Rgb::new(220, 90, 80);
const WARN: Rgb = Rgb::new(240, 200, 80);
const PANEL: Rgb = Rgb::new(30, 34, 40);

/// Renders one screen of the quiz.
pub struct QuizView {
    /// Maximum text column width; wider terminals get side margins.
    max_text_w: u16,
}

impl Default for QuizView {
    fn default() -> Self {
        Self { max_text_w: 72 }
    }
}

impl QuizView {
    pub fn new(max_text_w: u16) -> Self {
        Self {
            max_text_w: max_text_w.max(16),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }

        let text_w = viewport.width.saturating_sub(4).min(self.max_text_w);
        let left = viewport.width.saturating_sub(text_w) / 2;

        if snap.ended {
            self.draw_results(fb, snap, left, text_w);
        } else {
            self.draw_header(fb, snap, viewport);
            match snap.phase {
                Phase::ShowInfo => self.draw_info(fb, snap, viewport),
                Phase::ShowQuestion => {
                    self.draw_question(fb, snap, left, text_w);
                }
                Phase::ShowOptions => {
                    let y = self.draw_question(fb, snap, left, text_w);
                    let y = self.draw_options(fb, snap, left, text_w, y + 1);
                    self.draw_feedback(fb, snap, left, y + 1);
                    self.draw_countdown(fb, snap, viewport, left, text_w);
                }
                Phase::Transitioning => {
                    let mid = viewport.height / 2;
                    fb.put_str_centered(mid, "Next question...", CellStyle::fg(MUTED));
                }
                Phase::GameEnded => {}
            }
        }

        self.draw_footer(fb, snap, viewport);
        if snap.exit_prompt {
            self.draw_exit_prompt(fb, viewport);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_header(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let bar = CellStyle::fg(TEXT).on(PANEL);
        fb.fill_rect(0, 0, viewport.width, 1, ' ', bar);

        let mode = if snap.challenge { "Challenge" } else { "Level" };
        let x = fb.put_str(1, 0, mode, bar.bold());
        let x = fb.put_str(x + 1, 0, "·", bar.dim());
        fb.put_str(x + 1, 0, &snap.category, CellStyle::fg(ACCENT).on(PANEL));

        let progress = format!("{}/{}", snap.question_number, snap.total);
        fb.put_str_centered(0, &progress, bar);

        let score = format!("Score {}", snap.score);
        let w = score.chars().count() as u16;
        fb.put_str(viewport.width.saturating_sub(w + 1), 0, &score, bar.bold());
    }

    fn draw_info(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let mid = viewport.height / 2;
        let title = format!("Question {}", snap.question_number);
        fb.put_str_centered(mid.saturating_sub(1), &title, CellStyle::fg(TEXT).bold());
        fb.put_str_centered(mid + 1, "Get ready...", CellStyle::fg(MUTED));
    }

    /// Returns the row after the question text.
    fn draw_question(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        left: u16,
        w: u16,
    ) -> u16 {
        let mut y = 2;
        for line in wrap(&snap.content, w as usize) {
            fb.put_str(left, y, &line, CellStyle::fg(TEXT).bold());
            y += 1;
        }
        y
    }

    /// Returns the row after the last option.
    fn draw_options(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        left: u16,
        w: u16,
        mut y: u16,
    ) -> u16 {
        let picked = snap.answer.and_then(|a| a.selected());
        for (i, text) in snap.options.iter().enumerate() {
            let style = match (snap.correct, picked) {
                (Some(c), _) if c == i => CellStyle::fg(GOOD).bold(),
                (Some(_), Some(p)) if p == i => CellStyle::fg(BAD).bold(),
                (Some(_), _) => CellStyle::fg(MUTED).dim(),
                (None, _) => CellStyle::fg(TEXT),
            };
            let marker = match (snap.correct, picked) {
                (Some(c), _) if c == i => '✓',
                (Some(_), Some(p)) if p == i => '✗',
                _ => ' ',
            };

            let label = format!("{marker} {}. ", option_label(i));
            let x = fb.put_str(left, y, &label, style);
            let body_w = w.saturating_sub(x - left) as usize;
            for (n, line) in wrap(text, body_w).into_iter().enumerate() {
                if n > 0 {
                    y += 1;
                }
                fb.put_str(x, y, &line, style);
            }
            y += 2;
        }
        y
    }

    fn draw_feedback(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, left: u16, y: u16) {
        let Some(answer) = snap.answer else {
            return;
        };
        match answer {
            AnswerRecord::TimedOut => {
                fb.put_str(left, y, "Time's up!", CellStyle::fg(WARN).bold());
            }
            AnswerRecord::Selected(i) if snap.correct == Some(i) => {
                let msg = format!("Correct! +{}", snap.points);
                fb.put_str(left, y, &msg, CellStyle::fg(GOOD).bold());
            }
            AnswerRecord::Selected(_) => {
                fb.put_str(left, y, "Wrong answer", CellStyle::fg(BAD).bold());
            }
        }
    }

    fn draw_countdown(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        left: u16,
        w: u16,
    ) {
        let y = viewport.height.saturating_sub(3);
        let secs = format!(" {}s", snap.countdown);
        let bar_w = w.saturating_sub(secs.chars().count() as u16);
        let filled = (bar_w as u32 * snap.countdown as u32 / COUNTDOWN_SECS as u32) as u16;
        let color = match snap.countdown {
            0..=2 => BAD,
            3..=4 => WARN,
            _ => GOOD,
        };
        let style = if snap.answer.is_some() {
            CellStyle::fg(color).dim()
        } else {
            CellStyle::fg(color)
        };

        fb.fill_rect(left, y, filled, 1, '█', style);
        let empty = CellStyle::fg(MUTED).dim();
        fb.fill_rect(left + filled, y, bar_w.saturating_sub(filled), 1, '░', empty);
        fb.put_str(left + bar_w, y, &secs, style.bold());
    }

    fn draw_results(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, left: u16, w: u16) {
        let Some(result) = snap.result else {
            return;
        };
        let mut y = 2;

        if !result.completed {
            fb.put_str_centered(y, "Quiz left early", CellStyle::fg(WARN).bold());
            y += 2;
            let line = format!("Score {} (not saved)", result.score);
            fb.put_str_centered(y, &line, CellStyle::fg(MUTED));
            return;
        }

        let title = if snap.challenge {
            "Challenge complete"
        } else {
            "Level complete"
        };
        fb.put_str_centered(y, title, CellStyle::fg(ACCENT).bold());
        y += 2;

        let stars = (0..3u8)
            .map(|i| if i < result.reward.stars { "★" } else { "☆" })
            .collect::<Vec<_>>()
            .join(" ");
        fb.put_str_centered(y, &stars, CellStyle::fg(WARN).bold());
        y += 2;

        let rows = [
            ("Score", result.score.to_string()),
            ("Correct", format!("{}/{}", result.correct, result.total)),
            ("Coins", format!("+{}", result.reward.currency)),
        ];
        let label_w = 10;
        let block_w = (label_w + 8).min(w);
        let x = left + w.saturating_sub(block_w) / 2;
        for (label, value) in rows {
            fb.put_str(x, y, label, CellStyle::fg(MUTED));
            fb.put_str(x + label_w, y, &value, CellStyle::fg(TEXT).bold());
            y += 1;
        }
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let y = viewport.height.saturating_sub(1);
        let help = if snap.exit_prompt {
            "y leave · n stay"
        } else if snap.ended {
            "r play again · q quit"
        } else if snap.accepts_answer() {
            "1-4 / a-d answer · esc leave"
        } else {
            "esc leave"
        };
        fb.put_str_centered(y, help, CellStyle::fg(MUTED).dim());
    }

    fn draw_exit_prompt(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        const LINES: [&str; 3] = [
            "Leave the quiz?",
            "Your progress will not be saved.",
            "[y] Leave    [n] Stay",
        ];
        let inner_w = LINES.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4;
        let box_w = (inner_w + 2).min(viewport.width);
        let box_h = (LINES.len() as u16 * 2 + 1).min(viewport.height);
        let x = viewport.width.saturating_sub(box_w) / 2;
        let y = viewport.height.saturating_sub(box_h) / 2;

        let panel = CellStyle::fg(TEXT).on(PANEL);
        fb.fill_rect(x, y, box_w, box_h, ' ', panel);
        draw_border(fb, x, y, box_w, box_h, CellStyle::fg(WARN).on(PANEL));

        for (i, line) in LINES.iter().enumerate() {
            let style = if i == 0 { panel.bold() } else { panel };
            let lw = line.chars().count() as u16;
            let lx = x + box_w.saturating_sub(lw) / 2;
            fb.put_str(lx, y + 1 + i as u16 * 2, line, style);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            lines.push(chars.drain(..width).collect());
        }
        let wl = chars.len();
        if wl == 0 {
            continue;
        }
        if line_len > 0 && line_len + 1 + wl > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(chars);
        line_len += wl;
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Reward, SessionResult};

    fn snap(phase: Phase) -> SessionSnapshot {
        SessionSnapshot {
            category: "paper".into(),
            challenge: true,
            phase,
            question_number: 3,
            total: 10,
            content: "Where do greasy pizza boxes go?".into(),
            options: vec!["Paper bin".into(), "General waste".into()],
            score: 350,
            ..SessionSnapshot::default()
        }
    }

    fn vp() -> Viewport {
        Viewport::new(60, 24)
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 5).is_empty());
        assert!(wrap("x", 0).is_empty());
    }

    #[test]
    fn header_shows_progress_and_score() {
        let fb = QuizView::default().render(&snap(Phase::ShowInfo), vp());
        let header = fb.row_text(0);
        assert!(header.contains("Challenge"));
        assert!(header.contains("paper"));
        assert!(header.contains("3/10"));
        assert!(header.contains("Score 350"));
        assert!(fb.contains_text("Question 3"));
        assert!(!fb.contains_text("greasy"));
    }

    #[test]
    fn question_phase_hides_options() {
        let fb = QuizView::default().render(&snap(Phase::ShowQuestion), vp());
        assert!(fb.contains_text("greasy pizza"));
        assert!(!fb.contains_text("Paper bin"));
    }

    #[test]
    fn options_phase_lists_labelled_options_and_countdown() {
        let mut s = snap(Phase::ShowOptions);
        s.countdown = 6;
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("A. Paper bin"));
        assert!(fb.contains_text("B. General waste"));
        assert!(fb.contains_text("6s"));
        assert!(fb.contains_text("1-4 / a-d answer"));
    }

    #[test]
    fn answered_question_marks_correct_and_wrong() {
        let mut s = snap(Phase::ShowOptions);
        s.answer = Some(AnswerRecord::Selected(0));
        s.correct = Some(1);
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("✗ A. Paper bin"));
        assert!(fb.contains_text("✓ B. General waste"));
        assert!(fb.contains_text("Wrong answer"));

        s.answer = Some(AnswerRecord::Selected(1));
        s.points = 175;
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("Correct! +175"));

        // Correct pick that scored nothing.
        s.points = 0;
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("Correct! +0"));
        assert!(!fb.contains_text("Wrong answer"));

        s.answer = Some(AnswerRecord::TimedOut);
        s.points = 0;
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("Time's up!"));
    }

    #[test]
    fn exit_prompt_overlays_screen() {
        let mut s = snap(Phase::ShowOptions);
        s.exit_prompt = true;
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("Leave the quiz?"));
        assert!(fb.contains_text("[y] Leave"));
    }

    #[test]
    fn results_screen_shows_reward() {
        let mut s = snap(Phase::GameEnded);
        s.ended = true;
        s.result = Some(SessionResult::new(1750, 10, 10, 10, true));
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("Challenge complete"));
        assert!(fb.contains_text("★ ★ ★"));
        assert!(fb.contains_text("1750"));
        assert!(fb.contains_text("+80"));
        assert!(fb.contains_text("r play again"));
        assert_eq!(s.result.map(|r| r.reward), Some(Reward { stars: 3, currency: 80 }));
    }

    #[test]
    fn left_session_is_marked_unsaved() {
        let mut s = snap(Phase::GameEnded);
        s.ended = true;
        s.result = Some(SessionResult::new(400, 2, 3, 10, false));
        let fb = QuizView::default().render(&s, vp());
        assert!(fb.contains_text("Quiz left early"));
        assert!(fb.contains_text("not saved"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let mut s = snap(Phase::ShowOptions);
        s.exit_prompt = true;
        for (w, h) in [(0, 0), (1, 1), (5, 3), (12, 4)] {
            let _ = QuizView::default().render(&s, Viewport::new(w, h));
        }
    }
}
