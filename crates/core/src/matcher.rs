//! Match engine - tap protocol, match detection, cascades and power-ups
//!
//! Every player action resolves synchronously to a settled grid before
//! returning. Presentation code may replay the returned reports step by
//! step for animation; the outcome never depends on that pacing.
//!
//! # Cascade loop
//!
//! 1. Find every three-in-a-row (horizontal and vertical). None: combo
//!    resets to 0 and the loop ends.
//! 2. Remove the union of matched ids, bump the combo, score the step.
//! 3. If the grid is empty, stop: the level is won.
//! 4. Drop each column, refill up to the ceiling, go to 1.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::block::Block;
use crate::error::EngineError;
use crate::factory::BlockFactory;
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::scoring::cascade_score;
use crate::types::{
    BlockId, PollutantKind, PowerUpKind, MATCH_LEN, MAX_CASCADE_STEPS, POWERUP_RADIUS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchAxis {
    Horizontal,
    Vertical,
}

/// One same-kind triple. Overlapping triples are reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub axis: MatchAxis,
    pub cells: [BlockId; MATCH_LEN],
    /// Lowest (row, col) of the triple
    pub origin: (i8, i8),
}

/// Scan for every horizontal (`col..col+2`) and vertical (`row..row+2`) triple
pub fn find_matches(grid: &Grid) -> Vec<Match> {
    let mut matches = Vec::new();
    for row in 0..grid.height() as i8 {
        for col in 0..grid.width() as i8 {
            let Some(first) = grid.block_at(row, col) else {
                continue;
            };
            for (axis, dr, dc) in [(MatchAxis::Horizontal, 0, 1), (MatchAxis::Vertical, 1, 0)] {
                let mut run: ArrayVec<BlockId, MATCH_LEN> = ArrayVec::new();
                for step in 0..MATCH_LEN as i8 {
                    match grid.block_at(row + dr * step, col + dc * step) {
                        Some(b) if b.can_match_with(first) => run.push(b.id),
                        _ => break,
                    }
                }
                if let Ok(cells) = run.into_inner() {
                    matches.push(Match {
                        axis,
                        cells,
                        origin: (row, col),
                    });
                }
            }
        }
    }
    matches
}

/// Union of the ids of all matches
pub fn matched_ids(matches: &[Match]) -> HashSet<BlockId> {
    matches.iter().flat_map(|m| m.cells).collect()
}

/// Result of a tap
#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    /// The session was not accepting input
    Ignored,
    /// The block now waits for a second tap
    Selected(BlockId),
    /// Selection dropped without touching the grid
    Deselected,
    /// Kinds were exchanged and the cascade resolved
    Swapped {
        first: BlockId,
        second: BlockId,
        report: ResolveReport,
    },
}

/// One remove/drop/refill round of a cascade
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeStep {
    pub combo: u32,
    pub cleared: Vec<Block>,
    pub score: u32,
    pub refilled: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolveReport {
    pub steps: Vec<CascadeStep>,
    pub score: u32,
    /// The last removal left the grid empty
    pub cleared_grid: bool,
    /// False only if the step cap was hit with matches remaining
    pub settled: bool,
}

impl ResolveReport {
    pub fn cleared_count(&self) -> usize {
        self.steps.iter().map(|s| s.cleared.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUpReport {
    pub kind: PowerUpKind,
    pub target: BlockId,
    pub cleared: Vec<Block>,
    pub refilled: usize,
    pub cleared_grid: bool,
}

/// Selection and combo state for one grid
#[derive(Debug, Clone)]
pub struct MatchEngine {
    selected: Option<BlockId>,
    combo: u32,
    refill_height: u8,
    powerup_radius: u8,
}

impl MatchEngine {
    /// `refill_height` is the row count columns are topped up to
    pub fn new(refill_height: u8) -> Self {
        Self {
            selected: None,
            combo: 0,
            refill_height,
            powerup_radius: POWERUP_RADIUS,
        }
    }

    pub fn with_powerup_radius(mut self, radius: u8) -> Self {
        self.powerup_radius = radius;
        self
    }

    pub fn selected(&self) -> Option<BlockId> {
        self.selected
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn refill_height(&self) -> u8 {
        self.refill_height
    }

    /// Forget selection and combo (new level or restart)
    pub fn reset(&mut self) {
        self.selected = None;
        self.combo = 0;
    }

    /// Drop the pending selection, if any
    pub fn clear_selection(&mut self, grid: &mut Grid) {
        if let Some(id) = self.selected.take() {
            grid.set_selected(id, false);
        }
    }

    /// Two-phase tap protocol.
    ///
    /// First tap selects. A second tap on an orthogonal neighbour swaps the
    /// two kinds and resolves the cascade; any other second tap just clears
    /// the selection. A swap that forms no match is kept as is.
    pub fn handle_tap(
        &mut self,
        grid: &mut Grid,
        factory: &mut BlockFactory,
        rng: &mut impl RandomSource,
        id: BlockId,
    ) -> Result<TapOutcome, EngineError> {
        let Some(target) = grid.find(id).copied() else {
            self.clear_selection(grid);
            return Err(EngineError::InvalidTap { id });
        };

        let first = match self.selected.and_then(|sel| grid.find(sel).copied()) {
            Some(first) => first,
            None => {
                // Nothing selected, or the selected block was cleared since.
                self.selected = Some(id);
                grid.set_selected(id, true);
                return Ok(TapOutcome::Selected(id));
            }
        };

        self.clear_selection(grid);
        if first.id == target.id || !first.is_adjacent(&target) {
            return Ok(TapOutcome::Deselected);
        }

        grid.swap_kinds(first.id, target.id);
        debug!(first = %first.id, second = %target.id, "swap");
        let report = self.resolve(grid, factory, rng)?;
        Ok(TapOutcome::Swapped {
            first: first.id,
            second: target.id,
            report,
        })
    }

    /// Run the cascade loop until the grid settles or empties
    pub fn resolve(
        &mut self,
        grid: &mut Grid,
        factory: &mut BlockFactory,
        rng: &mut impl RandomSource,
    ) -> Result<ResolveReport, EngineError> {
        grid.settle_flags();
        let mut report = ResolveReport::default();

        while report.steps.len() < MAX_CASCADE_STEPS {
            let matches = find_matches(grid);
            if matches.is_empty() {
                self.combo = 0;
                report.settled = true;
                return Ok(report);
            }

            let cleared = grid.remove(&matched_ids(&matches));
            self.combo += 1;
            let score = cascade_score(cleared.len(), self.combo);
            report.score = report.score.saturating_add(score);

            let refilled = if grid.is_empty() {
                0
            } else {
                grid.drop_blocks();
                factory.refill(grid, rng, self.refill_height)?
            };
            debug!(
                combo = self.combo,
                cleared = cleared.len(),
                score,
                refilled,
                "cascade step"
            );
            report.steps.push(CascadeStep {
                combo: self.combo,
                cleared,
                score,
                refilled,
            });

            if grid.is_empty() {
                self.combo = 0;
                report.cleared_grid = true;
                report.settled = true;
                return Ok(report);
            }
        }

        warn!(steps = report.steps.len(), "cascade hit the step cap");
        Ok(report)
    }

    /// Ids a power-up aimed at `target` would clear
    pub fn power_up_targets(&self, grid: &Grid, kind: PowerUpKind, target: &Block) -> HashSet<BlockId> {
        let r = self.powerup_radius as i16;
        let (trow, tcol) = (target.row as i16, target.col as i16);
        grid.blocks()
            .filter(|b| match kind {
                PowerUpKind::PpCotton => {
                    b.kind == PollutantKind::Particle
                        && (b.row as i16 - trow).abs() <= r
                        && (b.col as i16 - tcol).abs() <= r
                }
                PowerUpKind::CtoLaser => {
                    b.kind == PollutantKind::Microbe && (b.row == target.row || b.col == target.col)
                }
                PowerUpKind::RoWave => b.kind == target.kind,
            })
            .map(|b| b.id)
            .collect()
    }

    /// Apply a power-up effect without any inventory check.
    ///
    /// Clears, then drops and refills; never cascades and never scores. A
    /// power-up that clears nothing leaves the grid untouched.
    pub fn apply_power_up(
        &mut self,
        grid: &mut Grid,
        factory: &mut BlockFactory,
        rng: &mut impl RandomSource,
        kind: PowerUpKind,
        target: BlockId,
    ) -> Result<PowerUpReport, EngineError> {
        let Some(block) = grid.find(target).copied() else {
            return Err(EngineError::InvalidTarget { id: target });
        };
        self.clear_selection(grid);
        grid.settle_flags();

        let ids = self.power_up_targets(grid, kind, &block);
        let cleared = grid.remove(&ids);
        let cleared_grid = grid.is_empty();
        let refilled = if cleared.is_empty() || cleared_grid {
            0
        } else {
            grid.drop_blocks();
            factory.refill(grid, rng, self.refill_height)?
        };
        debug!(
            power_up = kind.as_str(),
            target = %target,
            cleared = cleared.len(),
            refilled,
            "power-up"
        );

        Ok(PowerUpReport {
            kind,
            target,
            cleared,
            refilled,
            cleared_grid,
        })
    }
}
