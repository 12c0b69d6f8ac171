//! Geometry utilities and the hexagonal cell mapping
//!
//! The lattice is an "odd-r" offset grid: odd rows are pushed right by half a
//! cell. With `row_height = spacing * √3/2` every pair of adjacent cell
//! centres is exactly `spacing` apart.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble::Bubble;

/// √3 / 2
const HEX_ROW_FACTOR: f32 = 0.866_025_4;

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    p1.distance(p2)
}

/// Strict circle-circle overlap. Touching circles do not overlap.
#[inline]
pub fn circles_overlap(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    distance(p1, p2) < r1 + r2
}

/// Strict overlap test between two bubbles (no tolerance)
#[inline]
pub fn overlaps(b1: &Bubble, b2: &Bubble) -> bool {
    circles_overlap(b1.pos, b1.radius, b2.pos, b2.radius)
}

/// Offset-grid cell coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_odd_row(&self) -> bool {
        self.row.rem_euclid(2) == 1
    }

    /// The six adjacent cells, clockwise from the right-hand neighbour.
    ///
    /// Cells outside the arena are included; callers filter them.
    pub fn neighbors(&self) -> [Cell; 6] {
        let Cell { row, col } = *self;
        // Odd rows sit half a cell to the right, so their diagonal
        // neighbours are shifted one column right as well.
        let shift = if self.is_odd_row() { 1 } else { 0 };
        [
            Cell::new(row, col + 1),
            Cell::new(row + 1, col + shift),
            Cell::new(row + 1, col + shift - 1),
            Cell::new(row, col - 1),
            Cell::new(row - 1, col + shift - 1),
            Cell::new(row - 1, col + shift),
        ]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Pure cell <-> world mapping for a hex lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    /// Distance between adjacent cell centres
    pub spacing: f32,
    /// World position of cell (0, 0)
    pub origin: Vec2,
}

impl HexLayout {
    pub fn new(spacing: f32, origin: Vec2) -> Self {
        Self { spacing, origin }
    }

    /// Vertical distance between row centres
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.spacing * HEX_ROW_FACTOR
    }

    /// World centre of a cell
    pub fn to_world(&self, cell: Cell) -> Vec2 {
        let offset = if cell.is_odd_row() {
            self.spacing * 0.5
        } else {
            0.0
        };
        Vec2::new(
            cell.col as f32 * self.spacing + offset + self.origin.x,
            cell.row as f32 * self.row_height() + self.origin.y,
        )
    }

    /// Cell whose centre is closest to `point`.
    ///
    /// Rounding the row first can pick the wrong row near a row boundary, so
    /// the rows either side are checked as well. Ties go to the lower row,
    /// then the lower column.
    pub fn nearest_cell(&self, point: Vec2) -> Cell {
        let local = point - self.origin;
        let approx_row = snap_index(local.y / self.row_height());

        let mut best = Cell::new(approx_row, 0);
        let mut best_dist = f32::INFINITY;
        for row in approx_row - 1..=approx_row + 1 {
            let offset = if row.rem_euclid(2) == 1 {
                self.spacing * 0.5
            } else {
                0.0
            };
            let col = snap_index((local.x - offset) / self.spacing);
            for col in col - 1..=col + 1 {
                let cell = Cell::new(row, col);
                let dist = self.to_world(cell).distance_squared(point);
                if dist < best_dist {
                    best = cell;
                    best_dist = dist;
                }
            }
        }
        best
    }
}

/// Round to a cell index, leaving room for the ±1 search around it
#[inline]
fn snap_index(v: f32) -> i32 {
    (v.round() as i32).clamp(i32::MIN + 1, i32::MAX - 1)
}

/// Snap a world point to the nearest cell of `layout`
#[inline]
pub fn nearest_cell(layout: &HexLayout, point: Vec2) -> Cell {
    layout.nearest_cell(point)
}
