//! Player profile persisted as JSON.
//!
//! Holds currency, scores, unlocked levels and the power-up inventory, and
//! plugs into a session as its [`PlayerStore`].

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::EngineError;
use crate::engine::PlayerStore;
use crate::types::PowerUpKind;

/// Coins granted to a brand-new profile
pub const STARTING_COINS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub coins: u32,
    pub best_score: u32,
    pub total_score: u64,
    pub unlocked_levels: BTreeSet<u32>,
    pub powerups: BTreeMap<PowerUpKind, u32>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            best_score: 0,
            total_score: 0,
            unlocked_levels: BTreeSet::from([1]),
            powerups: BTreeMap::new(),
        }
    }
}

impl Profile {
    /// Fresh profile holding `count` of each power-up
    pub fn with_starter_powerups(count: u32) -> Self {
        let mut profile = Self::default();
        if count > 0 {
            for kind in PowerUpKind::ALL {
                profile.powerups.insert(kind, count);
            }
        }
        profile
    }

    pub fn highest_unlocked(&self) -> u32 {
        self.unlocked_levels.iter().next_back().copied().unwrap_or(1)
    }
}

/// A [`Profile`] bound to the file it was loaded from
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    profile: Profile,
}

impl ProfileStore {
    /// Read the profile at `path`, or start a fresh one if the file is missing
    pub fn load(path: impl AsRef<Path>, starter_powerups: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let profile = if path.exists() {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read profile {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to parse profile {}", path.display()))?
        } else {
            info!(path = %path.display(), "creating new profile");
            Profile::with_starter_powerups(starter_powerups)
        };
        Ok(Self { path, profile })
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.profile).context("failed to encode profile")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write profile {}", self.path.display()))?;
        debug!(path = %self.path.display(), "profile saved");
        Ok(())
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlayerStore for ProfileStore {
    fn powerup_count(&self, kind: PowerUpKind) -> u32 {
        self.profile.powerups.get(&kind).copied().unwrap_or(0)
    }

    fn spend_powerup(&mut self, kind: PowerUpKind) -> Result<(), EngineError> {
        match self.profile.powerups.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(EngineError::InsufficientPowerup { kind }),
        }
    }

    fn add_currency(&mut self, amount: u32) {
        self.profile.coins = self.profile.coins.saturating_add(amount);
    }

    fn unlock_level(&mut self, level: u32) {
        self.profile.unlocked_levels.insert(level);
    }

    fn record_best_score(&mut self, score: u32) {
        self.profile.best_score = self.profile.best_score.max(score);
    }

    fn add_total_score(&mut self, score: u32) {
        self.profile.total_score = self.profile.total_score.saturating_add(score as u64);
    }
}
