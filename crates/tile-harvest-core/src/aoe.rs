use crate::cell::Cell;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AoeShape {
    SingleTile,
    #[default]
    Cross,
    Square3x3,
}

impl AoeShape {
    pub fn cell_count(self) -> usize {
        match self {
            AoeShape::SingleTile => 1,
            AoeShape::Cross => 5,
            AoeShape::Square3x3 => 9,
        }
    }
}

/// Cells covered by `shape` around `center`, centre first.
///
/// No terrain filtering happens here. The order only drives animation
/// sequencing. Neighbours that would leave the `i32` coordinate range are
/// dropped rather than wrapped.
pub fn footprint(center: Cell, shape: AoeShape) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(shape.cell_count());
    cells.push(center);
    match shape {
        AoeShape::SingleTile => {}
        AoeShape::Cross => {
            cells.extend(
                [Cell::UP, Cell::DOWN, Cell::LEFT, Cell::RIGHT]
                    .into_iter()
                    .filter_map(|dir| center.checked_offset(dir.x, dir.y)),
            );
        }
        AoeShape::Square3x3 => {
            for dx in -1..=1 {
                for dy in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    if let Some(cell) = center.checked_offset(dx, dy) {
                        cells.push(cell);
                    }
                }
            }
        }
    }
    cells
}

/// Timing of one ripple: each painted footprint cell starts after a delay
/// proportional to its ring, then animates for `per_cell_duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct RipplePlan {
    pub center: Cell,
    pub cells: Vec<(Cell, f64)>,
    pub duration: f64,
}

impl RipplePlan {
    pub fn new(
        center: Cell,
        footprint: &[Cell],
        has_terrain: impl Fn(Cell) -> bool,
        delay_per_ring: f64,
        per_cell_duration: f64,
    ) -> Self {
        let cells: Vec<(Cell, f64)> = footprint
            .iter()
            .copied()
            .filter(|&c| has_terrain(c))
            .map(|c| (c, center.chebyshev_distance(c) as f64 * delay_per_ring))
            .collect();
        let duration = cells
            .iter()
            .map(|&(_, delay)| delay + per_cell_duration)
            .fold(0.0f64, f64::max);
        Self {
            center,
            cells,
            duration,
        }
    }
}
