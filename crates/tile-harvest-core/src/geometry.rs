use crate::cell::Cell;
use std::collections::HashSet;
use std::{error::Error, fmt};

/// Conversions between world space and grid cells, plus the painted terrain.
///
/// The simulation only ever asks the geometry; it never stores positions
/// derived from it beyond the spawn position recorded on each resource.
pub trait GridGeometry {
    fn cell_of(&self, position: [f64; 2]) -> Cell;

    /// Centre of `cell` in world space.
    fn world_position_of(&self, cell: Cell) -> [f64; 2];

    /// Every cell with terrain. Order must be stable for a given layer so a
    /// seeded pick is reproducible.
    fn paintable_cells(&self) -> Vec<Cell>;

    fn has_terrain(&self, cell: Cell) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    InvalidTileSize { width: f64, height: f64 },
    InvalidOrigin,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidTileSize { width, height } => write!(
                f,
                "tile size must be finite and positive (got {width} x {height})"
            ),
            GeometryError::InvalidOrigin => write!(f, "layer origin must be finite"),
        }
    }
}

impl Error for GeometryError {}

/// Axis-aligned tile layer: a set of painted cells laid out on a regular grid.
#[derive(Clone, Debug)]
pub struct TileLayer {
    tile_size: [f64; 2],
    origin: [f64; 2],
    painted: HashSet<Cell>,
}

impl TileLayer {
    pub fn new(tile_size: [f64; 2], origin: [f64; 2]) -> Result<Self, GeometryError> {
        let [width, height] = tile_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GeometryError::InvalidTileSize { width, height });
        }
        if !(origin[0].is_finite() && origin[1].is_finite()) {
            return Err(GeometryError::InvalidOrigin);
        }
        Ok(Self {
            tile_size,
            origin,
            painted: HashSet::new(),
        })
    }

    /// Layer with `width * height` painted cells starting at (0, 0).
    pub fn filled(tile_size: [f64; 2], width: i32, height: i32) -> Result<Self, GeometryError> {
        let mut layer = Self::new(tile_size, [0.0, 0.0])?;
        layer.paint_rect(Cell::ZERO, width, height);
        Ok(layer)
    }

    pub fn tile_size(&self) -> [f64; 2] {
        self.tile_size
    }

    /// Returns true if the cell was newly painted.
    pub fn paint(&mut self, cell: Cell) -> bool {
        self.painted.insert(cell)
    }

    /// Returns true if the cell had terrain.
    pub fn erase(&mut self, cell: Cell) -> bool {
        self.painted.remove(&cell)
    }

    pub fn paint_rect(&mut self, top_left: Cell, width: i32, height: i32) {
        for dy in 0..height.max(0) {
            for dx in 0..width.max(0) {
                if let Some(cell) = top_left.checked_offset(dx, dy) {
                    self.painted.insert(cell);
                }
            }
        }
    }

    pub fn painted_count(&self) -> usize {
        self.painted.len()
    }
}

impl GridGeometry for TileLayer {
    fn cell_of(&self, position: [f64; 2]) -> Cell {
        let fx = ((position[0] - self.origin[0]) / self.tile_size[0]).floor();
        let fy = ((position[1] - self.origin[1]) / self.tile_size[1]).floor();
        // `as` saturates for out-of-range floats and maps NaN to 0.
        Cell::new(fx as i32, fy as i32)
    }

    fn world_position_of(&self, cell: Cell) -> [f64; 2] {
        [
            self.origin[0] + (cell.x as f64 + 0.5) * self.tile_size[0],
            self.origin[1] + (cell.y as f64 + 0.5) * self.tile_size[1],
        ]
    }

    fn paintable_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.painted.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    fn has_terrain(&self, cell: Cell) -> bool {
        self.painted.contains(&cell)
    }
}
