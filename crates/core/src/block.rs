//! Block module - a single pollutant token on the grid
//!
//! Blocks are plain data. Gameplay only ever compares `kind`; the transient
//! flags exist for the presentation layer (highlight, fall and clear
//! animations) and are never read by the rules.

use crate::types::{BlockId, PollutantInfo, PollutantKind};

/// A pollutant token occupying one cell.
///
/// `row` 0 is the bottom of the pipe. The grid keeps `row`/`col` in sync with
/// the cell that stores the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub kind: PollutantKind,
    pub row: i8,
    pub col: i8,
    /// Set when the block was moved by a drop or created by a refill
    pub falling: bool,
    /// Set while the block waits for a second tap
    pub selected: bool,
    /// Set on blocks handed back after being cleared
    pub eliminating: bool,
}

impl Block {
    pub fn new(id: BlockId, kind: PollutantKind, row: i8, col: i8) -> Self {
        Self {
            id,
            kind,
            row,
            col,
            falling: false,
            selected: false,
            eliminating: false,
        }
    }

    /// Presentation metadata (color, description, filter stage)
    pub fn info(&self) -> &'static PollutantInfo {
        self.kind.info()
    }

    pub fn position(&self) -> (i8, i8) {
        (self.row, self.col)
    }

    pub fn can_match_with(&self, other: &Block) -> bool {
        self.kind == other.kind
    }

    /// Orthogonal neighbours only (Manhattan distance exactly 1)
    pub fn is_adjacent(&self, other: &Block) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr + dc == 1
    }
}
