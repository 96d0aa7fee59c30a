//! Core rules - pure, deterministic, and testable
//!
//! This crate holds the grid model and every matching rule. It has **no
//! dependencies** on UI, timers, or persistence, making it:
//!
//! - **Deterministic**: randomness is injected through [`RandomSource`]
//! - **Synchronous**: each action resolves to a settled grid before returning
//! - **Portable**: runs headless, in tests, or behind any frontend
//!
//! # Module Structure
//!
//! - [`block`]: a single pollutant token
//! - [`grid`]: fixed-size block matrix with drop/compaction
//! - [`factory`]: level-driven kind selection, layouts and refills
//! - [`matcher`]: tap protocol, match detection, cascades, power-ups
//! - [`scoring`]: cascade scoring, time budgets, rewards
//! - [`rng`]: injectable randomness
//! - [`snapshot`]: owned grid views for presentation
//!
//! # Example
//!
//! ```
//! use aqua_match_core::{BlockFactory, MatchEngine, SequenceRng, TapOutcome};
//!
//! let mut factory = BlockFactory::new(1);
//! let mut grid = factory.grid_from_rows(3, 4, &["pmp", "mpc"]).unwrap();
//! let mut engine = MatchEngine::new(3);
//! let mut rng = SequenceRng::constant(0);
//!
//! let a = grid.block_at(0, 1).unwrap().id;
//! let b = grid.block_at(1, 1).unwrap().id;
//! engine.handle_tap(&mut grid, &mut factory, &mut rng, a).unwrap();
//! let outcome = engine.handle_tap(&mut grid, &mut factory, &mut rng, b).unwrap();
//!
//! // Swapping brings three particles onto row 0, which clears and scores.
//! match outcome {
//!     TapOutcome::Swapped { report, .. } => assert_eq!(report.steps[0].score, 30),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod block;
pub mod error;
pub mod factory;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use aqua_match_types as types;

pub use block::Block;
pub use error::EngineError;
pub use factory::{density_percent, types_for_level, BlockFactory};
pub use grid::Grid;
pub use matcher::{
    find_matches, matched_ids, CascadeStep, Match, MatchAxis, MatchEngine, PowerUpReport,
    ResolveReport, TapOutcome,
};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use scoring::{cascade_score, completion_coins, level_time_limit, revive_clear_count};
pub use snapshot::{BlockView, GridSnapshot};
