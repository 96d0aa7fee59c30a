//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behaviour beyond lookups, making them
//! usable in any context (core rules, session state machine, terminal view,
//! persistence).
//!
//! # Grid Dimensions
//!
//! The reference pipe section is 8 columns wide and 12 rows tall:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 12 rows (indexed 0-11), row 0 is the bottom of the pipe
//! - **Initial fill**: rows 0-5; rows 6-11 start empty as the loss buffer
//! - **Home row**: row 11 (`height - 1`); a pollutant there loses the level
//!
//! # Level Tiers
//!
//! | Levels | Pollutants | Time budget |
//! |--------|------------|-------------|
//! | 1-5 | particle | 300s |
//! | 6-15 | particle, microbe | 240s |
//! | 16-30 | particle, microbe, chemical | 180s |
//! | 31+ | particle, microbe, chemical | 120s |
//!
//! # Examples
//!
//! ```
//! use aqua_match_types::{GamePhase, PollutantKind, PowerUpKind, GRID_HEIGHT, GRID_WIDTH};
//!
//! let kind = PollutantKind::from_str("Microbe").unwrap();
//! assert_eq!(kind, PollutantKind::Microbe);
//! assert_eq!(kind.info().eliminate_score, 20);
//!
//! assert_eq!(PowerUpKind::from_str("ro_wave"), Some(PowerUpKind::RoWave));
//! assert!(GamePhase::Completed.is_terminal());
//!
//! assert_eq!(GRID_WIDTH, 8);
//! assert_eq!(GRID_HEIGHT, 12);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid width in cells (8 columns)
pub const GRID_WIDTH: u8 = 8;

/// Grid height in cells (12 rows)
pub const GRID_HEIGHT: u8 = 12;

/// Rows filled at level start (the rest is loss buffer)
pub const INITIAL_ROWS: u8 = 6;

/// Upper bound for either grid dimension.
///
/// Per-column scratch buffers are sized by this value.
pub const MAX_GRID_DIM: usize = 32;

/// Minimum run length that counts as a match
pub const MATCH_LEN: usize = 3;

/// Points per cleared cell before the combo multiplier
pub const CELL_SCORE: u32 = 10;

/// Revives allowed per attempt
pub const MAX_REVIVE: u32 = 2;

/// Seconds granted by a revive
pub const REVIVE_TIME_BONUS_SECS: u32 = 10;

/// Share of blocks removed by a revive (percent, rounded up)
pub const REVIVE_CLEAR_PERCENT: u32 = 30;

/// Hard cap on blocks removed by a revive
pub const REVIVE_CLEAR_CAP: usize = 10;

/// Default half-width of the PP cotton clearing box
pub const POWERUP_RADIUS: u8 = 1;

/// Blocks removed by one strong flush
pub const FLUSH_CLEAR_CAP: usize = 5;

/// Strong flush cooldown in seconds
pub const FLUSH_COOLDOWN_SECS: u32 = 30;

/// Score points per coin awarded on level completion
pub const SCORE_PER_COIN: u32 = 100;

/// Logical seconds advanced by one scheduler tick
pub const TICK_SECS: u32 = 1;

/// Safety cap on cascade steps resolved by a single action
pub const MAX_CASCADE_STEPS: usize = 256;

/// Time budget tiers: `(last level of tier, seconds)`
///
/// Levels beyond the last tier use [`FINAL_TIME_LIMIT_SECS`].
pub const LEVEL_TIME_LIMITS: [(u32, u32); 3] = [(5, 300), (15, 240), (30, 180)];

/// Time budget for levels past every tier in [`LEVEL_TIME_LIMITS`]
pub const FINAL_TIME_LIMIT_SECS: u32 = 120;

/// Density layout fill chance at level 0 (percent)
pub const DENSITY_BASE_PERCENT: u32 = 40;

/// Density layout fill chance added per level (percent)
pub const DENSITY_STEP_PERCENT: u32 = 2;

/// Density layout fill chance ceiling (percent)
pub const DENSITY_CAP_PERCENT: u32 = 70;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_defaults() {
        assert_eq!(GRID_WIDTH, 8);
        assert_eq!(GRID_HEIGHT, 12);
        assert_eq!(INITIAL_ROWS, 6);
        assert_eq!(MAX_REVIVE, 2);
        assert_eq!(REVIVE_TIME_BONUS_SECS, 10);
        assert_eq!(REVIVE_CLEAR_CAP, 10);
        assert!((GRID_WIDTH as usize) <= MAX_GRID_DIM);
        assert!((GRID_HEIGHT as usize) <= MAX_GRID_DIM);
    }

    #[test]
    fn pollutant_strings_roundtrip() {
        for kind in PollutantKind::ALL {
            assert_eq!(PollutantKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PollutantKind::from_str("sludge"), None);
    }

    #[test]
    fn power_up_strings() {
        assert_eq!(PowerUpKind::PpCotton.as_str(), "pp_cotton");
        assert_eq!(PowerUpKind::from_str("CTO_LASER"), Some(PowerUpKind::CtoLaser));
        assert_eq!(PowerUpKind::from_str("bomb"), None);
    }

    #[test]
    fn water_quality_thresholds() {
        assert_eq!(WaterQuality::from_occupancy(0, 96), WaterQuality::Excellent);
        assert_eq!(WaterQuality::from_occupancy(28, 96), WaterQuality::Excellent);
        assert_eq!(WaterQuality::from_occupancy(29, 96), WaterQuality::Good);
        assert_eq!(WaterQuality::from_occupancy(57, 96), WaterQuality::Good);
        assert_eq!(WaterQuality::from_occupancy(58, 96), WaterQuality::Poor);
        assert_eq!(WaterQuality::from_occupancy(5, 0), WaterQuality::Poor);
    }

    #[test]
    fn phase_strings_and_terminality() {
        assert_eq!(GamePhase::GameOver.as_str(), "game_over");
        assert_eq!(GamePhase::Playing.to_string(), "playing");
        assert!(!GamePhase::Paused.is_terminal());
        assert!(GamePhase::GameOver.is_terminal());
    }

    #[test]
    fn pollutant_table_lookup() {
        assert_eq!(PollutantKind::Particle.info().filter, "PP cotton");
        assert_eq!(PollutantKind::Chemical.info().eliminate_score, 30);
    }
}

/// The three pollutant families
///
/// Each family is removed by one filter stage:
/// - **Particle**: rust and silt, caught by PP cotton
/// - **Microbe**: bacteria and viruses, caught by CTO carbon
/// - **Chemical**: heavy metals and pesticides, caught by the RO membrane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollutantKind {
    Particle,
    Microbe,
    Chemical,
}

/// Presentation metadata for a pollutant kind.
///
/// Gameplay never branches on these values; only kind equality matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollutantInfo {
    pub color: (u8, u8, u8),
    pub hardness: &'static str,
    pub description: &'static str,
    pub filter: &'static str,
    pub eliminate_score: u32,
    pub glyph: char,
}

const POLLUTANT_TABLE: [PollutantInfo; 3] = [
    PollutantInfo {
        color: (139, 69, 19),
        hardness: "easy",
        description: "particle pollutant (rust, silt)",
        filter: "PP cotton",
        eliminate_score: 10,
        glyph: 'o',
    },
    PollutantInfo {
        color: (34, 139, 34),
        hardness: "medium",
        description: "microbes (bacteria, viruses)",
        filter: "CTO carbon",
        eliminate_score: 20,
        glyph: '*',
    },
    PollutantInfo {
        color: (138, 43, 226),
        hardness: "hard",
        description: "chemical pollutant (heavy metals, pesticides)",
        filter: "RO membrane",
        eliminate_score: 30,
        glyph: '#',
    },
];

impl PollutantKind {
    /// Every kind, in difficulty order
    pub const ALL: [PollutantKind; 3] = [
        PollutantKind::Particle,
        PollutantKind::Microbe,
        PollutantKind::Chemical,
    ];

    /// Parse pollutant kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use aqua_match_types::PollutantKind;
    ///
    /// assert_eq!(PollutantKind::from_str("particle"), Some(PollutantKind::Particle));
    /// assert_eq!(PollutantKind::from_str("CHEMICAL"), Some(PollutantKind::Chemical));
    /// assert_eq!(PollutantKind::from_str("oil"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "particle" => Some(PollutantKind::Particle),
            "microbe" => Some(PollutantKind::Microbe),
            "chemical" => Some(PollutantKind::Chemical),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PollutantKind::Particle => "particle",
            PollutantKind::Microbe => "microbe",
            PollutantKind::Chemical => "chemical",
        }
    }

    /// Static presentation data for this kind
    pub fn info(&self) -> &'static PollutantInfo {
        &POLLUTANT_TABLE[*self as usize]
    }
}

/// Consumable filter abilities
///
/// - **PpCotton**: clears particles in a square around the target
/// - **CtoLaser**: clears microbes sharing the target's row or column
/// - **RoWave**: clears every block of the target's kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    PpCotton,
    CtoLaser,
    RoWave,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::PpCotton,
        PowerUpKind::CtoLaser,
        PowerUpKind::RoWave,
    ];

    /// Parse power-up kind from its snake_case name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pp_cotton" => Some(PowerUpKind::PpCotton),
            "cto_laser" => Some(PowerUpKind::CtoLaser),
            "ro_wave" => Some(PowerUpKind::RoWave),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::PpCotton => "pp_cotton",
            PowerUpKind::CtoLaser => "cto_laser",
            PowerUpKind::RoWave => "ro_wave",
        }
    }

    /// Short human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::PpCotton => "PP bomb",
            PowerUpKind::CtoLaser => "CTO laser",
            PowerUpKind::RoWave => "RO wave",
        }
    }
}

/// Session lifecycle phase
///
/// `Menu → Playing → {Paused, GameOver, Completed}`. `GameOver` and
/// `Completed` end the attempt; a new attempt re-enters `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
    Completed,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
            GamePhase::Completed => "completed",
        }
    }

    /// True for phases that end the current attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Completed)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    /// The time budget ran out
    Timeout,
    /// A pollutant reached the home row
    Pollution,
}

impl LossReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossReason::Timeout => "timeout",
            LossReason::Pollution => "pollution",
        }
    }
}

/// Coarse water quality derived from grid occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterQuality {
    Excellent,
    Good,
    Poor,
}

impl WaterQuality {
    /// Rate `blocks` out of `capacity` cells: under 30% is excellent,
    /// under 60% is good, anything else is poor.
    pub fn from_occupancy(blocks: usize, capacity: usize) -> Self {
        if capacity == 0 {
            return WaterQuality::Poor;
        }
        let percent = blocks * 100 / capacity;
        if percent < 30 {
            WaterQuality::Excellent
        } else if percent < 60 {
            WaterQuality::Good
        } else {
            WaterQuality::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterQuality::Excellent => "excellent",
            WaterQuality::Good => "good",
            WaterQuality::Poor => "poor",
        }
    }
}

/// Stable identity of a block for its whole lifetime.
///
/// Ids are never reused within a factory; a refilled cell gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome notification emitted by a game session.
///
/// Sessions queue these; callers drain them after each call and map them
/// onto modals, rewards or the post-level mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The grid was emptied.
    LevelComplete { level: u32, score: u32, coins: u32 },
    /// Emitted right after `LevelComplete`; the caller may launch its
    /// post-level activity.
    PostLevel { level: u32 },
    /// The level was lost.
    GameOver { reason: LossReason, score: u32 },
    /// The player may call `revive()`.
    ReviveAvailable { remaining: u32 },
    /// The attempt ended for good.
    GameEnded { level: u32, score: u32 },
}
