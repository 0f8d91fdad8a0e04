//! Key mapping from terminal events to quiz actions.

use crate::types::QuizAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to quiz actions.
pub fn handle_key_event(key: KeyEvent) -> Option<QuizAction> {
    match key.code {
        // Options: 1-9 or letters a-d
        KeyCode::Char(c @ '1'..='9') => Some(QuizAction::Select(c as usize - '1' as usize)),
        KeyCode::Char(c @ ('a'..='d' | 'A'..='D')) => {
            Some(QuizAction::Select(c.to_ascii_lowercase() as usize - 'a' as usize))
        }

        // Leaving
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(QuizAction::Exit),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(QuizAction::ConfirmExit),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(QuizAction::CancelExit),

        // Replay
        KeyCode::Char('r') | KeyCode::Char('R') => Some(QuizAction::Replay),

        _ => None,
    }
}

/// Check if key should quit immediately, skipping the exit prompt.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
