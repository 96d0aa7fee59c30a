//! Key mapping from terminal events to frontend commands.

use crate::types::PowerUpKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What the player asked for; the runner turns these into session calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    MoveCursor(Direction),
    /// Tap the block under the cursor
    Tap,
    PowerUp(PowerUpKind),
    Flush,
    TogglePause,
    Revive,
    EndAttempt,
    NextLevel,
    Restart,
}

/// Map keyboard input to frontend commands.
pub fn handle_key_event(key: KeyEvent) -> Option<UiCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let command = match key.code {
        // Cursor
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            UiCommand::MoveCursor(Direction::Up)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            UiCommand::MoveCursor(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            UiCommand::MoveCursor(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            UiCommand::MoveCursor(Direction::Right)
        }

        KeyCode::Char(' ') | KeyCode::Enter => UiCommand::Tap,

        // Power-ups
        KeyCode::Char('1') => UiCommand::PowerUp(PowerUpKind::PpCotton),
        KeyCode::Char('2') => UiCommand::PowerUp(PowerUpKind::CtoLaser),
        KeyCode::Char('3') => UiCommand::PowerUp(PowerUpKind::RoWave),
        KeyCode::Char('f') | KeyCode::Char('F') => UiCommand::Flush,

        // Lifecycle
        KeyCode::Char('p') | KeyCode::Char('P') => UiCommand::TogglePause,
        KeyCode::Char('v') | KeyCode::Char('V') => UiCommand::Revive,
        KeyCode::Char('x') | KeyCode::Char('X') => UiCommand::EndAttempt,
        KeyCode::Char('n') | KeyCode::Char('N') => UiCommand::NextLevel,
        KeyCode::Char('r') | KeyCode::Char('R') => UiCommand::Restart,

        _ => return None,
    };
    Some(command)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
