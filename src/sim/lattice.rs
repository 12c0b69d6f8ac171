//! Lattice model: the hex layout plus the occupancy map
//!
//! The occupancy map is the single source of truth for which cells are taken.
//! It is a `BTreeMap` so every walk over residents is ordered by row, then
//! column, which keeps the simulation deterministic.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleId, BubbleStatus};
use super::geometry::{Cell, HexLayout, circles_overlap};

/// Slack allowed when checking a cell centre against the arena walls
const BOUNDS_EPSILON: f32 = 1e-3;

/// Rectangular play field. Top wall at y = 0, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a circle fits entirely inside the field
    pub fn contains_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius >= -BOUNDS_EPSILON
            && pos.x + radius <= self.width + BOUNDS_EPSILON
            && pos.y - radius >= -BOUNDS_EPSILON
            && pos.y + radius <= self.height + BOUNDS_EPSILON
    }
}

/// Hex grid of resident bubbles
#[derive(Debug, Clone)]
pub struct Lattice {
    layout: HexLayout,
    arena: Arena,
    radius: f32,
    cells: BTreeMap<Cell, Bubble>,
}

impl Lattice {
    /// Empty lattice. `radius` is shared by every bubble in the session.
    pub fn new(layout: HexLayout, arena: Arena, radius: f32) -> Self {
        Self {
            layout,
            arena,
            radius,
            cells: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn spacing(&self) -> f32 {
        self.layout.spacing
    }

    #[inline]
    pub fn world_position_of(&self, cell: Cell) -> Vec2 {
        self.layout.to_world(cell)
    }

    #[inline]
    pub fn nearest_cell(&self, point: Vec2) -> Cell {
        self.layout.nearest_cell(point)
    }

    /// All six neighbours, including ones outside the arena
    #[inline]
    pub fn neighbors_of(&self, cell: Cell) -> [Cell; 6] {
        cell.neighbors()
    }

    /// Neighbours that currently hold a bubble
    pub fn occupied_neighbors(&self, cell: Cell) -> impl Iterator<Item = (Cell, &Bubble)> + '_ {
        cell.neighbors()
            .into_iter()
            .filter_map(move |n| self.cells.get(&n).map(|b| (n, b)))
    }

    /// Whether a bubble at `cell` would lie inside the arena
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && self
                .arena
                .contains_circle(self.world_position_of(cell), self.radius)
    }

    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<&Bubble> {
        self.cells.get(&cell)
    }

    /// First resident that a bubble of the session radius at `pos` would overlap
    pub fn first_overlap(&self, pos: Vec2) -> Option<&Bubble> {
        self.cells
            .values()
            .find(|r| circles_overlap(pos, self.radius, r.pos, r.radius))
    }

    /// Fix `bubble` at `cell`, snapping it to the cell centre.
    ///
    /// # Panics
    /// If the cell is taken or the bubble would overlap a resident. The
    /// placement resolver never asks for either.
    pub fn place(&mut self, cell: Cell, mut bubble: Bubble) -> BubbleId {
        assert!(
            !self.is_occupied(cell),
            "cell {cell} is already occupied"
        );
        let pos = self.world_position_of(cell);
        if let Some(other) = self.first_overlap(pos) {
            panic!("bubble {} at {cell} would overlap {}", bubble.id, other.id);
        }
        bubble.pos = pos;
        bubble.radius = self.radius;
        bubble.status = BubbleStatus::Resident { cell };
        let id = bubble.id;
        self.cells.insert(cell, bubble);
        id
    }

    /// Take the bubble out of `cell`, marking it removed
    pub fn remove(&mut self, cell: Cell) -> Option<Bubble> {
        self.cells.remove(&cell).map(|mut b| {
            b.status = BubbleStatus::Removed;
            b
        })
    }

    /// Residents in row-then-column order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Bubble)> + '_ {
        self.cells.iter().map(|(c, b)| (*c, b))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
