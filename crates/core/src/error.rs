//! Error taxonomy shared by the core and the session layer.

use thiserror::Error;

use crate::types::{BlockId, GamePhase, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Tap on an id that is not on the grid.
    #[error("tap on unknown block {id}")]
    InvalidTap { id: BlockId },

    /// Power-up aimed at an id that is not on the grid.
    #[error("power-up target {id} is not on the grid")]
    InvalidTarget { id: BlockId },

    /// Grid invariant violation: two blocks for one cell.
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: i8, col: i8 },

    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: i8, col: i8 },

    #[error("no {} left in the inventory", .kind.as_str())]
    InsufficientPowerup { kind: PowerUpKind },

    #[error("cannot {action} while {phase}")]
    InvalidStateTransition {
        phase: GamePhase,
        action: &'static str,
    },

    #[error("invalid grid configuration {width}x{height}")]
    InvalidDimensions { width: u8, height: u8 },

    #[error("strong flush is cooling down ({remaining}s left)")]
    FlushCoolingDown { remaining: u32 },
}

impl EngineError {
    /// Stable machine-readable code
    pub fn code(self) -> &'static str {
        match self {
            EngineError::InvalidTap { .. } => "invalid_tap",
            EngineError::InvalidTarget { .. } => "invalid_target",
            EngineError::CellOccupied { .. } => "cell_occupied",
            EngineError::OutOfBounds { .. } => "out_of_bounds",
            EngineError::InsufficientPowerup { .. } => "insufficient_powerup",
            EngineError::InvalidStateTransition { .. } => "invalid_state_transition",
            EngineError::InvalidDimensions { .. } => "invalid_dimensions",
            EngineError::FlushCoolingDown { .. } => "flush_cooling_down",
        }
    }

    /// Errors the caller can treat as a no-op (nothing was mutated).
    pub fn is_recoverable(self) -> bool {
        !matches!(
            self,
            EngineError::CellOccupied { .. } | EngineError::InvalidDimensions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let e = EngineError::InvalidStateTransition {
            phase: GamePhase::Paused,
            action: "revive",
        };
        assert_eq!(e.code(), "invalid_state_transition");
        assert_eq!(e.to_string(), "cannot revive while paused");

        let e = EngineError::InsufficientPowerup {
            kind: PowerUpKind::RoWave,
        };
        assert_eq!(e.to_string(), "no ro_wave left in the inventory");
        assert!(e.is_recoverable());
        assert!(!EngineError::CellOccupied { row: 1, col: 1 }.is_recoverable());
    }
}
