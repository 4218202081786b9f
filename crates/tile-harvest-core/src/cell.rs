use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid cell. Unbounded; validity comes from the painted layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ZERO: Cell = Cell { x: 0, y: 0 };
    pub const UP: Cell = Cell { x: 0, y: -1 };
    pub const DOWN: Cell = Cell { x: 0, y: 1 };
    pub const LEFT: Cell = Cell { x: -1, y: 0 };
    pub const RIGHT: Cell = Cell { x: 1, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// max(|dx|, |dy|). Saturates instead of overflowing on extreme coordinates.
    pub fn chebyshev_distance(self, other: Cell) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// True when `other` is one of the 8 surrounding cells.
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.chebyshev_distance(other) == 1
    }

    /// `None` when either axis leaves the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Cell> {
        Some(Cell {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
