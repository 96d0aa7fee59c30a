//! Player store - the session's currency, inventory and progress collaborator
//!
//! The session only reports deltas through this trait; how (and whether) the
//! values are persisted is up to the implementation.

use std::collections::{BTreeMap, BTreeSet};

use aqua_match_core::EngineError;
use aqua_match_types::PowerUpKind;

pub trait PlayerStore {
    fn powerup_count(&self, kind: PowerUpKind) -> u32;

    /// Take one unit; fails with `InsufficientPowerup` when none is left
    fn spend_powerup(&mut self, kind: PowerUpKind) -> Result<(), EngineError>;

    fn add_currency(&mut self, amount: u32);

    fn unlock_level(&mut self, level: u32);

    fn record_best_score(&mut self, score: u32);

    fn add_total_score(&mut self, score: u32);
}

/// In-memory store, used by default and in tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    pub coins: u32,
    pub best_score: u32,
    pub total_score: u64,
    pub unlocked: BTreeSet<u32>,
    pub powerups: BTreeMap<PowerUpKind, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `count` of every power-up
    pub fn with_powerups(count: u32) -> Self {
        let mut store = Self::default();
        for kind in PowerUpKind::ALL {
            store.powerups.insert(kind, count);
        }
        store
    }

    pub fn grant_powerup(&mut self, kind: PowerUpKind, count: u32) {
        let slot = self.powerups.entry(kind).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        self.unlocked.contains(&level)
    }
}

impl PlayerStore for MemoryStore {
    fn powerup_count(&self, kind: PowerUpKind) -> u32 {
        self.powerups.get(&kind).copied().unwrap_or(0)
    }

    fn spend_powerup(&mut self, kind: PowerUpKind) -> Result<(), EngineError> {
        match self.powerups.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(EngineError::InsufficientPowerup { kind }),
        }
    }

    fn add_currency(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn unlock_level(&mut self, level: u32) {
        self.unlocked.insert(level);
    }

    fn record_best_score(&mut self, score: u32) {
        self.best_score = self.best_score.max(score);
    }

    fn add_total_score(&mut self, score: u32) {
        self.total_score = self.total_score.saturating_add(score as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_until_empty() {
        let mut store = MemoryStore::new();
        store.grant_powerup(PowerUpKind::CtoLaser, 1);
        assert_eq!(store.powerup_count(PowerUpKind::CtoLaser), 1);
        assert!(store.spend_powerup(PowerUpKind::CtoLaser).is_ok());
        assert_eq!(
            store.spend_powerup(PowerUpKind::CtoLaser),
            Err(EngineError::InsufficientPowerup {
                kind: PowerUpKind::CtoLaser
            })
        );
        assert!(store.spend_powerup(PowerUpKind::RoWave).is_err());
    }

    #[test]
    fn best_score_only_grows() {
        let mut store = MemoryStore::new();
        store.record_best_score(300);
        store.record_best_score(120);
        assert_eq!(store.best_score, 300);
        store.add_total_score(300);
        store.add_total_score(120);
        assert_eq!(store.total_score, 420);
    }
}
