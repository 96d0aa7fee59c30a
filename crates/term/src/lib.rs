//! Terminal rendering for the demo frontend.
//!
//! A small game-oriented layer: a pure [`GameView`] lays a session snapshot
//! out into a [`FrameBuffer`], and [`TerminalRenderer`] flushes only the
//! changed cells to the terminal. No widget toolkit is involved.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use aqua_match_core as core;
pub use aqua_match_engine as engine;
pub use aqua_match_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, HudState, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
