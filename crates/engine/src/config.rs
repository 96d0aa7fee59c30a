//! Session tunables
//!
//! Defaults reproduce the reference scenario: an 8x12 pipe with the bottom six
//! rows filled, two revives per attempt and a 30 second flush cooldown.

use aqua_match_core::EngineError;
use aqua_match_types::{
    FLUSH_CLEAR_CAP, FLUSH_COOLDOWN_SECS, GRID_HEIGHT, GRID_WIDTH, INITIAL_ROWS, MAX_GRID_DIM,
    MAX_REVIVE, POWERUP_RADIUS, REVIVE_CLEAR_CAP, REVIVE_CLEAR_PERCENT, REVIVE_TIME_BONUS_SECS,
};
use serde::{Deserialize, Serialize};

/// How a level's starting blocks are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStyle {
    /// Bottom `initial_rows` rows completely filled
    #[default]
    Initial,
    /// Level-scaled random fill of the same region
    Density,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub width: u8,
    pub height: u8,
    pub initial_rows: u8,
    /// Rows each column is topped up to after a clear
    pub refill_height: u8,
    pub max_revive: u32,
    pub revive_time_bonus_secs: u32,
    pub revive_clear_percent: u32,
    pub revive_clear_cap: usize,
    pub powerup_radius: u8,
    pub flush_clear_cap: usize,
    pub flush_cooldown_secs: u32,
    pub layout: LayoutStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            initial_rows: INITIAL_ROWS,
            // Last row below the home row: a refill alone never loses.
            refill_height: GRID_HEIGHT - 1,
            max_revive: MAX_REVIVE,
            revive_time_bonus_secs: REVIVE_TIME_BONUS_SECS,
            revive_clear_percent: REVIVE_CLEAR_PERCENT,
            revive_clear_cap: REVIVE_CLEAR_CAP,
            powerup_radius: POWERUP_RADIUS,
            flush_clear_cap: FLUSH_CLEAR_CAP,
            flush_cooldown_secs: FLUSH_COOLDOWN_SECS,
            layout: LayoutStyle::Initial,
        }
    }
}

impl SessionConfig {
    /// Default tunables on a custom grid; the refill ceiling follows the height
    pub fn with_size(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            initial_rows: INITIAL_ROWS.min(height),
            refill_height: height.saturating_sub(1),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let dims_ok = (1..=MAX_GRID_DIM).contains(&(self.width as usize))
            && (1..=MAX_GRID_DIM).contains(&(self.height as usize))
            && self.initial_rows <= self.height
            && self.refill_height <= self.height;
        if dims_ok {
            Ok(())
        } else {
            Err(EngineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_scenario() {
        let cfg = SessionConfig::default();
        assert_eq!((cfg.width, cfg.height), (8, 12));
        assert_eq!(cfg.initial_rows, 6);
        assert_eq!(cfg.refill_height, 11);
        assert_eq!(cfg.max_revive, 2);
        assert_eq!(cfg.capacity(), 96);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        let mut cfg = SessionConfig::default();
        cfg.initial_rows = 13;
        assert!(cfg.validate().is_err());

        let mut cfg = SessionConfig::default();
        cfg.refill_height = 13;
        assert!(cfg.validate().is_err());

        assert!(SessionConfig::with_size(0, 5).validate().is_err());
        assert!(SessionConfig::with_size(33, 5).validate().is_err());
        assert!(SessionConfig::with_size(4, 4).validate().is_ok());
    }

    #[test]
    fn layout_style_wire_names() {
        let json = serde_json::to_string(&LayoutStyle::Density).unwrap();
        assert_eq!(json, "\"density\"");
    }
}
