//! Session layer - level lifecycle on top of the core rules
//!
//! [`GameSession`] owns one grid per attempt and drives it through the
//! `Menu → Playing → {Paused, GameOver, Completed}` phases. It never blocks:
//! the caller supplies taps and one-second ticks, then drains
//! [`SessionEvent`](aqua_match_types::SessionEvent)s.
//!
//! Currency, inventory and progress live behind the [`PlayerStore`] trait.
//!
//! # Example
//!
//! ```
//! use aqua_match_engine::{GameSession, SessionConfig};
//! use aqua_match_types::{GamePhase, LossReason};
//!
//! let mut session = GameSession::seeded(SessionConfig::default(), 42).unwrap();
//! session.init_level(1).unwrap();
//! assert_eq!(session.time_left(), 300);
//!
//! session.tick(300);
//! assert_eq!(session.phase(), GamePhase::GameOver);
//! assert_eq!(session.loss_reason(), Some(LossReason::Timeout));
//!
//! session.revive().unwrap();
//! assert_eq!(session.phase(), GamePhase::Playing);
//! assert_eq!(session.time_left(), 10);
//! ```

pub mod config;
pub mod session;
pub mod snapshot;
pub mod store;

pub use config::{LayoutStyle, SessionConfig};
pub use session::{FlushReport, GameSession, ReviveReport};
pub use snapshot::SessionSnapshot;
pub use store::{MemoryStore, PlayerStore};
