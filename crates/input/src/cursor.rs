use crate::map::Direction;

/// Grid cursor, clamped to the grid. Row 0 is the bottom, so `Up` increments the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: i8,
    pub col: i8,
    width: u8,
    height: u8,
}

impl Cursor {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            row: 0,
            col: 0,
            width,
            height,
        }
    }

    pub fn position(&self) -> (i8, i8) {
        (self.row, self.col)
    }

    pub fn step(&mut self, dir: Direction) {
        let (dr, dc) = match dir {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        };
        let max_row = self.height.saturating_sub(1) as i8;
        let max_col = self.width.saturating_sub(1) as i8;
        self.row = (self.row + dr).clamp(0, max_row);
        self.col = (self.col + dc).clamp(0, max_col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_to_grid() {
        let mut cursor = Cursor::new(3, 2);
        cursor.step(Direction::Down);
        cursor.step(Direction::Left);
        assert_eq!(cursor.position(), (0, 0));

        for _ in 0..5 {
            cursor.step(Direction::Up);
            cursor.step(Direction::Right);
        }
        assert_eq!(cursor.position(), (1, 2));
    }
}
