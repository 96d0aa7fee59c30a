//! Aqua Match (workspace facade crate).
//!
//! Re-exports the workspace crates as `aqua_match::{types,core,engine,input,term}`
//! and adds the pieces only the terminal binary needs: environment
//! configuration and the on-disk player profile.

pub mod config;
pub mod profile;

pub use aqua_match_core as core;
pub use aqua_match_engine as engine;
pub use aqua_match_input as input;
pub use aqua_match_term as term;
pub use aqua_match_types as types;
