//! Block factory - level-driven pollutant generation
//!
//! The active pollutant set widens with the level (a difficulty ramp); within
//! the set, kinds are drawn uniformly. The factory also owns the id counter so
//! every block created during a session has a distinct [`BlockId`].

use arrayvec::ArrayVec;
use tracing::debug;

use crate::block::Block;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{
    BlockId, PollutantKind, DENSITY_BASE_PERCENT, DENSITY_CAP_PERCENT, DENSITY_STEP_PERCENT,
    MAX_GRID_DIM,
};

const TIER_EASY: [PollutantKind; 1] = [PollutantKind::Particle];
const TIER_MEDIUM: [PollutantKind; 2] = [PollutantKind::Particle, PollutantKind::Microbe];

/// Pollutant kinds active at `level`
///
/// | Levels | Kinds |
/// |--------|-------|
/// | 1-5 | particle |
/// | 6-15 | particle, microbe |
/// | 16+ | particle, microbe, chemical |
pub fn types_for_level(level: u32) -> &'static [PollutantKind] {
    match level {
        0..=5 => &TIER_EASY,
        6..=15 => &TIER_MEDIUM,
        _ => &PollutantKind::ALL,
    }
}

/// Fill chance (percent) used by the density layout
pub fn density_percent(level: u32) -> u32 {
    DENSITY_BASE_PERCENT
        .saturating_add(DENSITY_STEP_PERCENT.saturating_mul(level))
        .min(DENSITY_CAP_PERCENT)
}

/// Creates blocks for one session
#[derive(Debug, Clone)]
pub struct BlockFactory {
    level: u32,
    next_id: u32,
}

impl BlockFactory {
    pub fn new(level: u32) -> Self {
        Self {
            level: level.max(1),
            next_id: 1,
        }
    }

    /// Switch to another level's kind set. Ids keep counting up.
    pub fn reset_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn types(&self) -> &'static [PollutantKind] {
        types_for_level(self.level)
    }

    /// Draw a kind uniformly from the active set
    pub fn random_kind(&self, rng: &mut impl RandomSource) -> PollutantKind {
        let types = self.types();
        types[rng.next_below(types.len() as u32) as usize]
    }

    /// Create a block with a fresh id
    pub fn create(&mut self, kind: PollutantKind, row: i8, col: i8) -> Block {
        let id = BlockId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Block::new(id, kind, row, col)
    }

    /// Completely fill rows `0..rows` of a `cols`-wide grid.
    ///
    /// Rows above `rows` stay empty; they are the loss buffer.
    pub fn initial_layout(&mut self, rng: &mut impl RandomSource, rows: u8, cols: u8) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(rows as usize * cols as usize);
        for row in 0..rows as i8 {
            for col in 0..cols as i8 {
                let kind = self.random_kind(rng);
                blocks.push(self.create(kind, row, col));
            }
        }
        blocks
    }

    /// Probabilistic fill of a `rows x cols` region.
    ///
    /// Each cell is kept with [`density_percent`] chance; the survivors of a
    /// column are stacked from row 0 so the layout is already compact.
    pub fn level_layout(&mut self, rng: &mut impl RandomSource, rows: u8, cols: u8) -> Vec<Block> {
        let percent = density_percent(self.level);
        let mut blocks = Vec::new();
        for col in 0..cols as i8 {
            let filled = (0..rows).filter(|_| rng.chance_percent(percent)).count();
            for row in 0..filled as i8 {
                let kind = self.random_kind(rng);
                blocks.push(self.create(kind, row, col));
            }
        }
        debug!(level = self.level, percent, blocks = blocks.len(), "density layout");
        blocks
    }

    /// Top every column up to `ceiling` rows with new falling blocks.
    ///
    /// Columns are filled left to right, bottom to top. Returns the number of
    /// blocks created.
    pub fn refill(
        &mut self,
        grid: &mut Grid,
        rng: &mut impl RandomSource,
        ceiling: u8,
    ) -> Result<usize, EngineError> {
        let ceiling = ceiling.min(grid.height());
        let mut created = 0;
        for col in 0..grid.width() as i8 {
            let mut fresh: ArrayVec<Block, MAX_GRID_DIM> = ArrayVec::new();
            for row in grid.column_top(col)..ceiling {
                let kind = self.random_kind(rng);
                let mut block = self.create(kind, row as i8, col);
                block.falling = true;
                fresh.push(block);
            }
            created += fresh.len();
            for block in fresh {
                grid.add(block)?;
            }
        }
        if created > 0 {
            debug!(created, ceiling, "refill");
        }
        Ok(created)
    }

    /// Build a grid from ASCII rows, `rows[0]` being row 0 (the bottom).
    ///
    /// `p`/`m`/`c` (any case) place particle/microbe/chemical blocks; any
    /// other character leaves the cell empty.
    pub fn grid_from_rows(
        &mut self,
        width: u8,
        height: u8,
        rows: &[&str],
    ) -> Result<Grid, EngineError> {
        let mut grid = Grid::new(width, height)?;
        for block in self.blocks_from_rows(rows) {
            grid.add(block)?;
        }
        Ok(grid)
    }

    /// Parse ASCII rows into blocks without placing them
    pub fn blocks_from_rows(&mut self, rows: &[&str]) -> Vec<Block> {
        let mut blocks = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let kind = match ch.to_ascii_lowercase() {
                    'p' => PollutantKind::Particle,
                    'm' => PollutantKind::Microbe,
                    'c' => PollutantKind::Chemical,
                    _ => continue,
                };
                let row = i8::try_from(row).unwrap_or(i8::MAX);
                let col = i8::try_from(col).unwrap_or(i8::MAX);
                blocks.push(self.create(kind, row, col));
            }
        }
        blocks
    }
}
