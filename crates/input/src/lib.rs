//! Terminal input module (frontend-facing).
//!
//! Maps `crossterm` key events into [`UiCommand`]s and tracks the grid
//! cursor. Nothing here touches game rules: commands are translated into
//! session calls by the binary.

pub mod cursor;
pub mod map;

pub use aqua_match_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit, Direction, UiCommand};
