//! Built-in levels
//!
//! A level is a board shape plus a shot budget. The shape decides which cells
//! of a `rows x columns` block start occupied; elements are drawn from a
//! seeded RNG so a level and seed always produce the same board.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{Cell, Element, LayoutEntry};

/// Highest built-in level number
pub const LEVEL_COUNT: u32 = 40;

/// Default board block
pub const DEFAULT_COLUMNS: u32 = 10;
pub const DEFAULT_ROWS: u32 = 13;

/// Board shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPattern {
    /// Every cell
    #[default]
    Full,
    /// Widest at the middle row
    Diamond,
    /// Four-row cycle sweeping left, centre, right, full
    Wave,
    /// Diagonal thirds alternating full, left half, right half
    Stripes,
    /// Narrow waist around the middle rows
    Hourglass,
    /// Rings around the centre
    Spiral,
    /// Three-wide vertical and horizontal bars through the centre
    Cross,
    /// Rows sliding right every two rows
    Staircase,
    /// Full rows joined by partial rows that keep every row connected
    Maze,
}

impl LevelPattern {
    /// Whether `(row, col)` starts occupied on a `rows x columns` board
    pub fn contains(&self, row: u32, col: u32, rows: u32, columns: u32) -> bool {
        let (r, c) = (row as i64, col as i64);
        let (h, w) = (rows as i64, columns as i64);
        let colf = col as f32;
        let wf = columns as f32;

        match self {
            LevelPattern::Full => true,
            LevelPattern::Diamond => {
                let from_centre = (r - h / 2).abs();
                let width = (w - from_centre).max(3);
                centred(c, w, width)
            }
            LevelPattern::Wave => match r % 4 {
                0 => colf < wf * 0.6,
                1 => wf * 0.2 <= colf && colf < wf * 0.8,
                2 => colf >= wf * 0.4,
                _ => true,
            },
            LevelPattern::Stripes => match (r + c) % 3 {
                0 => true,
                1 => c < w / 2,
                _ => c >= w / 2,
            },
            LevelPattern::Hourglass => {
                let from_centre = (r - h / 2).abs();
                let width = if from_centre <= 2 {
                    (w - 4).max(4)
                } else {
                    w - from_centre / 2
                };
                centred(c, w, width.clamp(3, w))
            }
            LevelPattern::Spiral => {
                let (centre_row, centre_col) = (h / 2, w / 2);
                let row_dist = (r - centre_row).abs() as f32;
                let col_dist = if r % 2 == 1 {
                    (colf - 0.5 - centre_col as f32).abs()
                } else {
                    (c - centre_col).abs() as f32
                };
                let max_dist = row_dist.max(col_dist);
                let reach = centre_row.min(centre_col) as f32;
                match ((row_dist + col_dist) as i64) % 3 {
                    0 => max_dist <= reach + 2.0,
                    1 => 2.0 <= max_dist && max_dist <= reach + 1.0,
                    _ => max_dist >= reach - 1.0,
                }
            }
            LevelPattern::Cross => (c - w / 2).abs() <= 1 || (r - h / 2).abs() <= 1,
            LevelPattern::Staircase => {
                let shift = (r / 2) % (w / 2).max(1);
                let width = (w - r / 4).max(7).min(w);
                let start = shift.min(w - width).max(0);
                start <= c && c < start + width
            }
            LevelPattern::Maze => {
                let mid = (w / 2 - 1)..(w / 2 + 2);
                match r % 4 {
                    0 => true,
                    1 => colf < wf * 0.6 || mid.contains(&c),
                    2 => colf >= wf * 0.4 || mid.contains(&c),
                    _ => c < 3 || c >= w - 3 || ((w / 2 - 2)..(w / 2 + 2)).contains(&c),
                }
            }
        }
    }
}

/// Whether `c` falls in a run of `width` cells centred on a row of `w`
fn centred(c: i64, w: i64, width: i64) -> bool {
    let start = (w - width) / 2;
    start <= c && c < start + width
}

/// One playable board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    pub max_shots: u32,
    pub pattern: LevelPattern,
}

impl Level {
    /// Built-in level `number` (1-based), or `None` past the last level
    pub fn builtin(number: u32) -> Option<Self> {
        use LevelPattern::*;

        let (pattern, max_shots, rows) = match number {
            1 => (Full, 20, 12),
            2 => (Diamond, 20, DEFAULT_ROWS),
            3 => (Wave, 18, DEFAULT_ROWS),
            4 => (Stripes, 16, DEFAULT_ROWS),
            5 => (Hourglass, 15, DEFAULT_ROWS),
            6 => (Spiral, 14, DEFAULT_ROWS),
            7 => (Cross, 13, 19),
            8 => (Staircase, 12, DEFAULT_ROWS),
            9 => (Maze, 11, DEFAULT_ROWS),
            // Budget shrinks by one shot per level down to a single shot
            10..=LEVEL_COUNT => (Full, 28u32.saturating_sub(number).max(1), DEFAULT_ROWS),
            _ => return None,
        };

        Some(Self {
            number,
            name: format!("Level {number}"),
            rows,
            columns: DEFAULT_COLUMNS,
            max_shots,
            pattern,
        })
    }

    /// Parse a level definition from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Cells this level starts with, row-major
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns)
                .filter(move |&col| self.pattern.contains(row, col, self.rows, self.columns))
                .map(move |col| Cell::new(row as i32, col as i32))
        })
    }

    /// Starting board with elements drawn uniformly from `elements`
    pub fn layout(&self, elements: &[Element], seed: u64) -> Vec<LayoutEntry> {
        if elements.is_empty() {
            return Vec::new();
        }
        let mut rng = Pcg32::seed_from_u64(seed ^ u64::from(self.number));
        self.cells()
            .map(|cell| LayoutEntry {
                cell,
                element: elements[rng.random_range(0..elements.len())],
            })
            .collect()
    }
}
