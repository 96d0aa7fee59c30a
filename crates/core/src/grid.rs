//! Grid module - the pipe section holding pollutant blocks
//!
//! The grid is a `width x height` matrix where each cell holds at most one
//! [`Block`]. Uses a flat vector (row-major, `row * width + col`) for cache
//! locality; dimensions are fixed for the grid's lifetime.
//! Coordinates: `(row, col)` where row 0 is the bottom of the pipe and
//! `height - 1` is the home row.

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::block::Block;
use crate::error::EngineError;
use crate::types::{BlockId, MAX_GRID_DIM};

/// Fixed-size matrix of blocks that owns the position invariants
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Option<Block>>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: u8, height: u8) -> Result<Self, EngineError> {
        if width == 0
            || height == 0
            || width as usize > MAX_GRID_DIM
            || height as usize > MAX_GRID_DIM
        {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, row: i8, col: i8) -> Option<usize> {
        if !self.contains(row, col) {
            return None;
        }
        Some((row as usize) * (self.width as usize) + (col as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Total number of cells
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Check if position lies inside the grid
    pub fn contains(&self, row: i8, col: i8) -> bool {
        row >= 0 && col >= 0 && row < self.height as i8 && col < self.width as i8
    }

    /// Block at (row, col); None if empty or out of bounds
    pub fn block_at(&self, row: i8, col: i8) -> Option<&Block> {
        self.index(row, col).and_then(|i| self.cells[i].as_ref())
    }

    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        self.block_at(row, col).is_some()
    }

    /// Place a block at its own coordinates.
    ///
    /// Fails without mutating if the cell is outside the grid or taken.
    pub fn add(&mut self, block: Block) -> Result<(), EngineError> {
        let (row, col) = block.position();
        let idx = self
            .index(row, col)
            .ok_or(EngineError::OutOfBounds { row, col })?;
        if self.cells[idx].is_some() {
            return Err(EngineError::CellOccupied { row, col });
        }
        self.cells[idx] = Some(block);
        Ok(())
    }

    /// Remove every block whose id is in `ids`.
    ///
    /// Each removed block is returned once, flagged `eliminating`, in
    /// row-major order. Unknown ids are ignored.
    pub fn remove(&mut self, ids: &HashSet<BlockId>) -> Vec<Block> {
        let mut removed = Vec::with_capacity(ids.len());
        if ids.is_empty() {
            return removed;
        }
        for cell in &mut self.cells {
            if cell.map_or(false, |b| ids.contains(&b.id)) {
                if let Some(mut block) = cell.take() {
                    block.eliminating = true;
                    block.selected = false;
                    removed.push(block);
                }
            }
        }
        removed
    }

    /// Iterate over live blocks in row-major order (bottom row first)
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.cells.iter().filter_map(|c| c.as_ref())
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks().map(|b| b.id).collect()
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.blocks().find(|b| b.id == id)
    }

    fn find_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.cells
            .iter_mut()
            .filter_map(|c| c.as_mut())
            .find(|b| b.id == id)
    }

    /// Number of live blocks
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Remove every block
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// One past the highest occupied row in `col` (0 for an empty column)
    pub fn column_top(&self, col: i8) -> u8 {
        (0..self.height as i8)
            .rev()
            .find(|&row| self.is_occupied(row, col))
            .map_or(0, |row| row as u8 + 1)
    }

    /// Highest occupied row anywhere on the grid
    pub fn top_row(&self) -> Option<i8> {
        self.blocks().map(|b| b.row).max()
    }

    /// Exchange the kinds of two blocks in place.
    ///
    /// Ids and positions stay put. Returns false if either id is missing.
    pub fn swap_kinds(&mut self, a: BlockId, b: BlockId) -> bool {
        let (Some(ka), Some(kb)) = (self.find(a).map(|x| x.kind), self.find(b).map(|x| x.kind))
        else {
            return false;
        };
        if let Some(block) = self.find_mut(a) {
            block.kind = kb;
        }
        if let Some(block) = self.find_mut(b) {
            block.kind = ka;
        }
        true
    }

    /// Set or clear the `selected` flag; returns false if the id is missing
    pub fn set_selected(&mut self, id: BlockId, selected: bool) -> bool {
        match self.find_mut(id) {
            Some(block) => {
                block.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Clear the `falling` flags left over from the previous action
    pub fn settle_flags(&mut self) {
        for block in self.cells.iter_mut().flatten() {
            block.falling = false;
        }
    }

    /// Compact every column toward row 0, keeping vertical order.
    ///
    /// Moved blocks are flagged `falling`. Returns how many blocks moved.
    pub fn drop_blocks(&mut self) -> usize {
        let width = self.width as usize;
        let mut moved = 0;

        for col in 0..width {
            // Gather bottom to top; the column never exceeds MAX_GRID_DIM.
            let mut column: ArrayVec<Block, MAX_GRID_DIM> = ArrayVec::new();
            for row in 0..self.height as usize {
                if let Some(block) = self.cells[row * width + col].take() {
                    column.push(block);
                }
            }

            for (row, mut block) in column.into_iter().enumerate() {
                if block.row != row as i8 {
                    block.row = row as i8;
                    block.falling = true;
                    moved += 1;
                }
                self.cells[row * width + col] = Some(block);
            }
        }

        moved
    }

    /// True when no column has an empty cell below an occupied one
    pub fn is_compact(&self) -> bool {
        (0..self.width as i8).all(|col| {
            let top = self.column_top(col) as i8;
            (0..top).all(|row| self.is_occupied(row, col))
        })
    }

    /// Render rows bottom-up as `p`/`m`/`c`/`.` strings (`result[0]` is row 0).
    ///
    /// Mirrors [`BlockFactory::grid_from_rows`](crate::factory::BlockFactory::grid_from_rows).
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.height as i8)
            .map(|row| {
                (0..self.width as i8)
                    .map(|col| match self.block_at(row, col) {
                        Some(block) => block.kind.as_str().chars().next().unwrap_or('?'),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }
}
