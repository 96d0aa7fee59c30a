use aqua_match_core::GridSnapshot;
use aqua_match_types::{BlockId, GamePhase, LossReason, WaterQuality};
use serde::Serialize;

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub level: u32,
    pub phase: GamePhase,
    pub score: u32,
    pub time_left: u32,
    pub revive_used: u32,
    pub max_revive: u32,
    pub combo: u32,
    pub selected: Option<BlockId>,
    pub flush_cooldown: u32,
    pub water_quality: WaterQuality,
    pub loss_reason: Option<LossReason>,
    pub grid: GridSnapshot,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            level: 0,
            phase: GamePhase::Menu,
            score: 0,
            time_left: 0,
            revive_used: 0,
            max_revive: 0,
            combo: 0,
            selected: None,
            flush_cooldown: 0,
            water_quality: WaterQuality::Excellent,
            loss_reason: None,
            grid: GridSnapshot::default(),
        }
    }
}

impl SessionSnapshot {
    pub fn revives_left(&self) -> u32 {
        self.max_revive.saturating_sub(self.revive_used)
    }

    /// Input is accepted only while playing
    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}
