//! Scoring module - cascade scoring and level budgets
//!
//! Rules:
//! - A cascade step scores `cells * CELL_SCORE`.
//! - From the second consecutive step on, that base is multiplied by the
//!   current combo (linear, recomputed per step, never compounded).
//! - Completion pays one coin per `SCORE_PER_COIN` points, rounded down.

use crate::types::{CELL_SCORE, FINAL_TIME_LIMIT_SECS, LEVEL_TIME_LIMITS, SCORE_PER_COIN};

/// Score for one cascade step clearing `cells` distinct blocks at `combo`
pub fn cascade_score(cells: usize, combo: u32) -> u32 {
    let base = (cells as u32).saturating_mul(CELL_SCORE);
    if combo > 1 {
        base.saturating_mul(combo)
    } else {
        base
    }
}

/// Time budget in seconds for `level`
pub fn level_time_limit(level: u32) -> u32 {
    LEVEL_TIME_LIMITS
        .iter()
        .find(|(last, _)| level <= *last)
        .map_or(FINAL_TIME_LIMIT_SECS, |&(_, secs)| secs)
}

/// Coins granted for finishing a level with `score`
pub fn completion_coins(score: u32) -> u32 {
    score / SCORE_PER_COIN
}

/// Blocks removed by a revive: `ceil(blocks * percent / 100)`, at most `cap`
pub fn revive_clear_count(blocks: usize, percent: u32, cap: usize) -> usize {
    let scaled = blocks * percent as usize;
    scaled.div_ceil(100).min(cap).min(blocks)
}
