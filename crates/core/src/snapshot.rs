use serde::Serialize;

use crate::block::Block;
use crate::grid::Grid;
use crate::types::{BlockId, PollutantKind};

/// Read-only view of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockView {
    pub id: BlockId,
    pub kind: PollutantKind,
    pub row: i8,
    pub col: i8,
    pub falling: bool,
    pub selected: bool,
}

impl From<&Block> for BlockView {
    fn from(value: &Block) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            row: value.row,
            col: value.col,
            falling: value.falling,
            selected: value.selected,
        }
    }
}

/// Owned copy of the grid for presentation and persistence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GridSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, bottom row first
    pub blocks: Vec<BlockView>,
}

impl GridSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.blocks.clear();
    }

    pub fn block_at(&self, row: i8, col: i8) -> Option<&BlockView> {
        self.blocks.iter().find(|b| b.row == row && b.col == col)
    }
}

impl Grid {
    /// Fill an existing snapshot, reusing its allocation
    pub fn snapshot_into(&self, out: &mut GridSnapshot) {
        out.width = self.width();
        out.height = self.height();
        out.blocks.clear();
        out.blocks.extend(self.blocks().map(BlockView::from));
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let mut out = GridSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::BlockFactory;

    #[test]
    fn test_snapshot_serializes_snake_case() {
        let mut factory = BlockFactory::new(1);
        let grid = factory.grid_from_rows(2, 2, &["p."]).unwrap();
        let snap = grid.snapshot();
        assert_eq!(snap.blocks.len(), 1);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["width"], 2);
        assert_eq!(json["blocks"][0]["kind"], "particle");
        assert_eq!(json["blocks"][0]["id"], 1);
    }

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let mut factory = BlockFactory::new(1);
        let grid = factory.grid_from_rows(3, 3, &["ppp", "m"]).unwrap();
        let mut snap = GridSnapshot::default();
        grid.snapshot_into(&mut snap);
        assert_eq!(snap.blocks.len(), 4);
        assert_eq!(snap.block_at(1, 0).map(|b| b.kind), Some(PollutantKind::Microbe));

        snap.clear();
        assert!(snap.blocks.is_empty());
    }
}
