//! Key mapping from terminal events to engine commands.

use crate::components::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to engine commands. Returns `None` for keys the
/// engine does not care about.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<Command> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Command::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Command::RotateCw),
        KeyCode::Char('q' | 'Q') => Some(Command::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('c' | 'C') => Some(Command::Hold),
        KeyCode::Char('p' | 'P') | KeyCode::Esc => Some(Command::TogglePause),

        // Session control
        KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('r' | 'R') => Some(Command::Restart),

        _ => None,
    }
}

/// Check if the key should quit the host application.
#[must_use]
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
