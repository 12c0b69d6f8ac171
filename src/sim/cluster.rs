//! Cluster matching and floating-group removal
//!
//! After a shot attaches, the same-element component around it pops if it is
//! large enough. Any residents that lose their path to the anchor row (row 0)
//! are then dropped as well.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::bubble::BubbleId;
use super::geometry::Cell;
use super::lattice::Lattice;

/// Row that holds the board up
pub const ANCHOR_ROW: i32 = 0;

/// Bubbles removed by one attachment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopOutcome {
    /// Members of the matched cluster
    pub matched: Vec<BubbleId>,
    /// Residents cut off from the anchor row by the match
    pub dropped: Vec<BubbleId>,
}

impl PopOutcome {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.dropped.is_empty()
    }

    /// Everything removed, matched first
    pub fn removed(&self) -> Vec<BubbleId> {
        self.matched.iter().chain(&self.dropped).copied().collect()
    }
}

/// Connected same-element component containing `start`, in row-major order.
///
/// Empty if `start` is not occupied.
pub fn find_cluster(lattice: &Lattice, start: Cell) -> Vec<Cell> {
    let Some(origin) = lattice.occupant(start) else {
        return Vec::new();
    };

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for (next, bubble) in lattice.occupied_neighbors(cell) {
            if origin.matches_element(bubble) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.into_iter().collect()
}

/// Residents with no path of adjacent residents to the anchor row
pub fn find_floating(lattice: &Lattice) -> Vec<Cell> {
    let mut anchored: BTreeSet<Cell> = lattice
        .iter()
        .map(|(cell, _)| cell)
        .filter(|cell| cell.row == ANCHOR_ROW)
        .collect();
    let mut queue: VecDeque<Cell> = anchored.iter().copied().collect();

    while let Some(cell) = queue.pop_front() {
        for (next, _) in lattice.occupied_neighbors(cell) {
            if anchored.insert(next) {
                queue.push_back(next);
            }
        }
    }

    lattice
        .iter()
        .map(|(cell, _)| cell)
        .filter(|cell| !anchored.contains(cell))
        .collect()
}

/// Pop the component at `start` if it reaches `threshold`, then drop floaters.
///
/// The floating pass runs on the board after the cluster is gone, so cluster
/// members never count as anchors. Nothing is removed if the cluster is too
/// small.
pub fn pop_from(lattice: &mut Lattice, start: Cell, threshold: usize) -> PopOutcome {
    let cluster = find_cluster(lattice, start);
    if cluster.len() < threshold {
        return PopOutcome::default();
    }

    let matched = remove_all(lattice, &cluster);
    let floating = find_floating(lattice);
    let dropped = remove_all(lattice, &floating);

    log::debug!(
        "popped {} at {start}, dropped {} floating",
        matched.len(),
        dropped.len()
    );
    PopOutcome { matched, dropped }
}

fn remove_all(lattice: &mut Lattice, cells: &[Cell]) -> Vec<BubbleId> {
    cells
        .iter()
        .filter_map(|cell| lattice.remove(*cell))
        .map(|b| b.id)
        .collect()
}
