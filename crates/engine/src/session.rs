//! Game session - level lifecycle, timer, loss detection and revives
//!
//! Phase machine:
//!
//! ```text
//! Menu ──init_level──▶ Playing ◀──resume── Paused
//!                        │  │ └──pause──────▲
//!          grid empty ◀──┘  └──▶ timeout / pollution
//!              │                      │
//!          Completed              GameOver ──revive──▶ Playing
//!              │                      │
//!          next_level            end_attempt (or no revives left)
//! ```
//!
//! Outcomes are queued as [`SessionEvent`]s; drain them with
//! [`GameSession::take_events`] after each call.

use std::collections::HashSet;

use aqua_match_core::{
    completion_coins, level_time_limit, revive_clear_count, Block, BlockFactory, EngineError,
    Grid, MatchEngine, PowerUpReport, RandomSource, SimpleRng, TapOutcome,
};
use aqua_match_types::{
    BlockId, GamePhase, LossReason, PollutantKind, PowerUpKind, SessionEvent, WaterQuality,
};
use tracing::{debug, info};

use crate::config::{LayoutStyle, SessionConfig};
use crate::snapshot::SessionSnapshot;
use crate::store::{MemoryStore, PlayerStore};

/// Outcome of a successful revive
#[derive(Debug, Clone, PartialEq)]
pub struct ReviveReport {
    pub revive_used: u32,
    pub revives_left: u32,
    pub time_left: u32,
    pub cleared: Vec<Block>,
}

/// Outcome of a strong flush
#[derive(Debug, Clone, PartialEq)]
pub struct FlushReport {
    pub cleared: Vec<Block>,
    pub cooldown: u32,
}

/// One level attempt over a grid, with its timer and revive budget
#[derive(Debug)]
pub struct GameSession<S = MemoryStore, R = SimpleRng> {
    config: SessionConfig,
    grid: Grid,
    factory: BlockFactory,
    engine: MatchEngine,
    rng: R,
    store: S,
    level: u32,
    phase: GamePhase,
    score: u32,
    time_left: u32,
    revive_used: u32,
    /// Set once the attempt has ended for good (GameEnded emitted)
    ended: bool,
    flush_cooldown: u32,
    loss_reason: Option<LossReason>,
    events: Vec<SessionEvent>,
}

impl GameSession<MemoryStore, SimpleRng> {
    /// Session with an in-memory store and a seeded LCG
    pub fn seeded(config: SessionConfig, seed: u32) -> Result<Self, EngineError> {
        Self::new(config, MemoryStore::new(), SimpleRng::new(seed))
    }
}

impl<S: PlayerStore, R: RandomSource> GameSession<S, R> {
    /// Create a session in the `Menu` phase. Call [`init_level`](Self::init_level) to play.
    pub fn new(config: SessionConfig, store: S, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height)?;
        let engine = MatchEngine::new(config.refill_height).with_powerup_radius(config.powerup_radius);
        Ok(Self {
            config,
            grid,
            factory: BlockFactory::new(1),
            engine,
            rng,
            store,
            level: 1,
            phase: GamePhase::Menu,
            score: 0,
            time_left: level_time_limit(1),
            revive_used: 0,
            ended: false,
            flush_cooldown: 0,
            loss_reason: None,
            events: Vec::new(),
        })
    }

    /// Reset grid, timer, score and revive counters, then start playing.
    ///
    /// Level 0 is treated as level 1.
    pub fn init_level(&mut self, level: u32) -> Result<SessionSnapshot, EngineError> {
        let level = level.max(1);
        self.level = level;
        self.factory.reset_level(level);
        self.engine.reset();
        self.grid.clear();

        let (rows, cols) = (self.config.initial_rows, self.config.width);
        let blocks = match self.config.layout {
            LayoutStyle::Initial => self.factory.initial_layout(&mut self.rng, rows, cols),
            LayoutStyle::Density => self.factory.level_layout(&mut self.rng, rows, cols),
        };
        for block in blocks {
            self.grid.add(block)?;
        }

        self.score = 0;
        self.time_left = level_time_limit(level);
        self.revive_used = 0;
        self.ended = false;
        self.flush_cooldown = 0;
        self.loss_reason = None;
        self.phase = GamePhase::Playing;
        info!(
            level,
            time_left = self.time_left,
            blocks = self.grid.len(),
            "level started"
        );

        self.check_cleared();
        Ok(self.snapshot())
    }

    /// Replay the current level from scratch
    pub fn restart(&mut self) -> Result<SessionSnapshot, EngineError> {
        self.init_level(self.level)
    }

    /// Start the level after the one just completed
    pub fn next_level(&mut self) -> Result<SessionSnapshot, EngineError> {
        if self.phase != GamePhase::Completed {
            return Err(self.reject("advance to the next level"));
        }
        self.init_level(self.level.saturating_add(1))
    }

    /// Advance the timer by `delta_secs` and evaluate loss conditions.
    ///
    /// Ignored unless playing. Returns true if the tick was applied.
    pub fn tick(&mut self, delta_secs: u32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        self.time_left = self.time_left.saturating_sub(delta_secs);
        self.flush_cooldown = self.flush_cooldown.saturating_sub(delta_secs);

        if self.time_left == 0 {
            self.enter_game_over(LossReason::Timeout);
        } else if self.is_polluted() {
            self.enter_game_over(LossReason::Pollution);
        }
        true
    }

    /// Drive the two-phase tap protocol
    pub fn handle_tap(&mut self, id: BlockId) -> Result<TapOutcome, EngineError> {
        if self.phase != GamePhase::Playing || self.grid.is_empty() {
            return Ok(TapOutcome::Ignored);
        }

        let outcome = self
            .engine
            .handle_tap(&mut self.grid, &mut self.factory, &mut self.rng, id)?;
        if let TapOutcome::Swapped { report, .. } = &outcome {
            self.score = self.score.saturating_add(report.score);
            debug!(
                steps = report.steps.len(),
                gained = report.score,
                score = self.score,
                "swap resolved"
            );
        }
        self.check_cleared();
        Ok(outcome)
    }

    /// Apply a power-up; the caller has already checked the inventory
    pub fn apply_power_up(
        &mut self,
        kind: PowerUpKind,
        target: BlockId,
    ) -> Result<PowerUpReport, EngineError> {
        if self.phase != GamePhase::Playing {
            return Err(self.reject("use a power-up"));
        }
        let report = self.engine.apply_power_up(
            &mut self.grid,
            &mut self.factory,
            &mut self.rng,
            kind,
            target,
        )?;
        self.check_cleared();
        Ok(report)
    }

    /// Apply a power-up from the store's inventory, spending one on success
    pub fn use_power_up(
        &mut self,
        kind: PowerUpKind,
        target: BlockId,
    ) -> Result<PowerUpReport, EngineError> {
        if self.phase != GamePhase::Playing {
            return Err(self.reject("use a power-up"));
        }
        if self.store.powerup_count(kind) == 0 {
            return Err(EngineError::InsufficientPowerup { kind });
        }
        let report = self.apply_power_up(kind, target)?;
        self.store.spend_powerup(kind)?;
        Ok(report)
    }

    /// Remove a few random blocks, then start the cooldown
    pub fn strong_flush(&mut self) -> Result<FlushReport, EngineError> {
        if self.phase != GamePhase::Playing {
            return Err(self.reject("flush"));
        }
        if self.flush_cooldown > 0 {
            return Err(EngineError::FlushCoolingDown {
                remaining: self.flush_cooldown,
            });
        }

        self.engine.clear_selection(&mut self.grid);
        self.grid.settle_flags();
        let count = self.config.flush_clear_cap.min(self.grid.len());
        let cleared = self.remove_random(count);
        self.flush_cooldown = self.config.flush_cooldown_secs;
        info!(cleared = cleared.len(), cooldown = self.flush_cooldown, "strong flush");

        self.check_cleared();
        Ok(FlushReport {
            cleared,
            cooldown: self.flush_cooldown,
        })
    }

    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.phase != GamePhase::Playing {
            return Err(self.reject("pause"));
        }
        self.phase = GamePhase::Paused;
        info!(level = self.level, "paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), EngineError> {
        if self.phase != GamePhase::Paused {
            return Err(self.reject("resume"));
        }
        self.phase = GamePhase::Playing;
        info!(level = self.level, "resumed");
        Ok(())
    }

    /// Spend a revive: bonus time, clear part of the grid, back to playing
    pub fn revive(&mut self) -> Result<ReviveReport, EngineError> {
        if !self.revive_available() {
            return Err(self.reject("revive"));
        }

        self.revive_used += 1;
        self.time_left = self
            .time_left
            .saturating_add(self.config.revive_time_bonus_secs);
        self.grid.settle_flags();
        let count = revive_clear_count(
            self.grid.len(),
            self.config.revive_clear_percent,
            self.config.revive_clear_cap,
        );
        let cleared = self.remove_random(count);

        self.phase = GamePhase::Playing;
        self.loss_reason = None;
        info!(
            revive_used = self.revive_used,
            cleared = cleared.len(),
            time_left = self.time_left,
            "revived"
        );

        self.check_cleared();
        Ok(ReviveReport {
            revive_used: self.revive_used,
            revives_left: self.revives_left(),
            time_left: self.time_left,
            cleared,
        })
    }

    /// Decline further revives and end the attempt
    pub fn end_attempt(&mut self) -> Result<(), EngineError> {
        if self.phase != GamePhase::GameOver || self.ended {
            return Err(self.reject("end the attempt"));
        }
        self.end_game();
        Ok(())
    }

    /// Swap in a scripted layout (`rows[0]` is the bottom row).
    ///
    /// On error the current grid is kept.
    pub fn replace_layout(&mut self, rows: &[&str]) -> Result<(), EngineError> {
        let mut grid = Grid::new(self.config.width, self.config.height)?;
        for block in self.factory.blocks_from_rows(rows) {
            grid.add(block)?;
        }
        self.grid = grid;
        self.engine.reset();
        if self.phase == GamePhase::Playing {
            self.check_cleared();
        }
        Ok(())
    }

    /// Drop a single block onto a cell, then evaluate loss conditions
    pub fn place_block(
        &mut self,
        kind: PollutantKind,
        row: i8,
        col: i8,
    ) -> Result<BlockId, EngineError> {
        let block = self.factory.create(kind, row, col);
        self.grid.add(block)?;
        if self.phase == GamePhase::Playing && self.is_polluted() {
            self.enter_game_over(LossReason::Pollution);
        }
        Ok(block.id)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn combo(&self) -> u32 {
        self.engine.combo()
    }

    pub fn selected(&self) -> Option<BlockId> {
        self.engine.selected()
    }

    pub fn revive_used(&self) -> u32 {
        self.revive_used
    }

    pub fn max_revive(&self) -> u32 {
        self.config.max_revive
    }

    pub fn revives_left(&self) -> u32 {
        self.config.max_revive.saturating_sub(self.revive_used)
    }

    pub fn revive_available(&self) -> bool {
        self.phase == GamePhase::GameOver && !self.ended && self.revive_used < self.config.max_revive
    }

    /// True once the attempt ended for good
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn flush_cooldown(&self) -> u32 {
        self.flush_cooldown
    }

    pub fn loss_reason(&self) -> Option<LossReason> {
        self.loss_reason
    }

    pub fn water_quality(&self) -> WaterQuality {
        WaterQuality::from_occupancy(self.grid.len(), self.grid.capacity())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Drain queued outcome events
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.level = self.level;
        out.phase = self.phase;
        out.score = self.score;
        out.time_left = self.time_left;
        out.revive_used = self.revive_used;
        out.max_revive = self.config.max_revive;
        out.combo = self.engine.combo();
        out.selected = self.engine.selected();
        out.flush_cooldown = self.flush_cooldown;
        out.water_quality = self.water_quality();
        out.loss_reason = self.loss_reason;
        self.grid.snapshot_into(&mut out.grid);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut out = SessionSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    fn reject(&self, action: &'static str) -> EngineError {
        EngineError::InvalidStateTransition {
            phase: self.phase,
            action,
        }
    }

    /// A pollutant sits on (or above) the home row
    fn is_polluted(&self) -> bool {
        let home = self.config.height as i8 - 1;
        self.grid.top_row().map_or(false, |row| row >= home)
    }

    /// Remove `count` distinct random blocks and compact the grid
    fn remove_random(&mut self, count: usize) -> Vec<Block> {
        let ids = self.grid.ids();
        let victims: HashSet<BlockId> = self.rng.sample(&ids, count).into_iter().collect();
        let cleared = self.grid.remove(&victims);
        self.grid.drop_blocks();
        cleared
    }

    fn check_cleared(&mut self) {
        if self.phase == GamePhase::Playing && self.grid.is_empty() {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        self.phase = GamePhase::Completed;
        self.engine.reset();

        let coins = completion_coins(self.score);
        self.store.unlock_level(self.level.saturating_add(1));
        self.store.record_best_score(self.score);
        self.store.add_total_score(self.score);
        self.store.add_currency(coins);
        info!(level = self.level, score = self.score, coins, "level complete");

        self.events.push(SessionEvent::LevelComplete {
            level: self.level,
            score: self.score,
            coins,
        });
        self.events.push(SessionEvent::PostLevel { level: self.level });
    }

    fn enter_game_over(&mut self, reason: LossReason) {
        self.engine.clear_selection(&mut self.grid);
        self.phase = GamePhase::GameOver;
        self.loss_reason = Some(reason);
        info!(
            level = self.level,
            reason = reason.as_str(),
            score = self.score,
            "game over"
        );
        self.events.push(SessionEvent::GameOver {
            reason,
            score: self.score,
        });

        if self.revive_used < self.config.max_revive {
            self.events.push(SessionEvent::ReviveAvailable {
                remaining: self.revives_left(),
            });
        } else {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.ended = true;
        self.store.record_best_score(self.score);
        info!(level = self.level, score = self.score, "attempt ended");
        self.events.push(SessionEvent::GameEnded {
            level: self.level,
            score: self.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_match_core::SequenceRng;

    fn small_session(rng: Vec<u32>) -> GameSession<MemoryStore, SequenceRng> {
        let config = SessionConfig::with_size(4, 6);
        GameSession::new(config, MemoryStore::new(), SequenceRng::new(rng)).unwrap()
    }

    #[test]
    fn test_new_session_waits_in_menu() {
        let mut session = GameSession::seeded(SessionConfig::default(), 7).unwrap();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(!session.tick(1));
        assert_eq!(
            session.handle_tap(BlockId(1)).unwrap(),
            TapOutcome::Ignored
        );
    }

    #[test]
    fn test_init_level_fills_reference_region() {
        let mut session = GameSession::seeded(SessionConfig::default(), 7).unwrap();
        let snap = session.init_level(3).unwrap();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.grid.blocks.len(), 48);
        assert_eq!(snap.time_left, 300);
        assert!(snap.grid.blocks.iter().all(|b| b.row < 6));
        assert_eq!(session.water_quality(), WaterQuality::Good);
    }

    #[test]
    fn test_level_zero_is_level_one() {
        let mut session = small_session(vec![0]);
        session.init_level(0).unwrap();
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_timeout_offers_revive() {
        let mut session = small_session(vec![0, 1]);
        session.init_level(16).unwrap();
        session.replace_layout(&["pmcp"]).unwrap();

        assert!(session.tick(179));
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.tick(1));
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.loss_reason(), Some(LossReason::Timeout));
        assert_eq!(
            session.take_events(),
            vec![
                SessionEvent::GameOver {
                    reason: LossReason::Timeout,
                    score: 0
                },
                SessionEvent::ReviveAvailable { remaining: 2 },
            ]
        );
        // Stray ticks are ignored.
        assert!(!session.tick(1));
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_placed_block_on_home_row_pollutes() {
        let mut session = small_session(vec![0]);
        session.init_level(1).unwrap();
        session.replace_layout(&["pm"]).unwrap();
        session.place_block(PollutantKind::Particle, 5, 3).unwrap();
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.loss_reason(), Some(LossReason::Pollution));
        assert!(session.time_left() > 0);
    }

    #[test]
    fn test_pause_blocks_ticks_until_resume() {
        let mut session = small_session(vec![0]);
        session.init_level(1).unwrap();
        session.pause().unwrap();
        assert!(!session.tick(5));
        assert_eq!(session.time_left(), 300);
        assert!(session.pause().is_err());
        session.resume().unwrap();
        assert!(session.tick(5));
        assert_eq!(session.time_left(), 295);
    }

    #[test]
    fn test_revive_from_playing_is_rejected() {
        let mut session = small_session(vec![0]);
        session.init_level(1).unwrap();
        let err = session.revive().unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidStateTransition {
                phase: GamePhase::Playing,
                action: "revive"
            }
        );
        assert_eq!(session.revive_used(), 0);
    }

    #[test]
    fn test_flush_cooldown_counts_down_on_ticks() {
        let mut session = small_session(vec![0, 3, 5, 7, 11]);
        session.init_level(16).unwrap();
        session.replace_layout(&["pmcp", "mcpm", "cpmc"]).unwrap();

        let report = session.strong_flush().unwrap();
        assert_eq!(report.cleared.len(), 5);
        assert_eq!(session.grid().len(), 7);
        assert!(session.grid().is_compact());
        assert_eq!(
            session.strong_flush().unwrap_err(),
            EngineError::FlushCoolingDown { remaining: 30 }
        );

        session.tick(30);
        assert_eq!(session.flush_cooldown(), 0);
        assert!(session.strong_flush().is_ok());
    }

    #[test]
    fn test_use_power_up_needs_inventory() {
        let mut session = small_session(vec![0]);
        session.init_level(16).unwrap();
        session.replace_layout(&["pmcp", "mcpm"]).unwrap();
        let target = session.grid().block_at(0, 2).unwrap().id;

        assert_eq!(
            session.use_power_up(PowerUpKind::RoWave, target).unwrap_err(),
            EngineError::InsufficientPowerup {
                kind: PowerUpKind::RoWave
            }
        );
        assert_eq!(session.grid().len(), 8);

        session.store_mut().grant_powerup(PowerUpKind::RoWave, 1);
        let report = session.use_power_up(PowerUpKind::RoWave, target).unwrap();
        assert_eq!(report.cleared.len(), 2);
        assert_eq!(session.store().powerup_count(PowerUpKind::RoWave), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_snapshot_serializes_phase_snake_case() {
        let mut session = small_session(vec![0]);
        session.init_level(1).unwrap();
        session.replace_layout(&["pm"]).unwrap();
        session.tick(300);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"], "game_over");
        assert_eq!(json["loss_reason"], "timeout");
        assert_eq!(json["grid"]["blocks"][1]["kind"], "microbe");
    }
}
