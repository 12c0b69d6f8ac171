//! Placement resolver: picks the cell a settling shot attaches to
//!
//! Candidates are tried in one ordered sequence, and every candidate must pass
//! the same acceptance test:
//! 1. the cell nearest the contact point;
//! 2. the free neighbours of the bubble that was hit, closest to the contact
//!    point first (ties by row, then column);
//! 3. rings of points around the contact point at whole multiples of the
//!    spacing, [`FALLBACK_ANGLES`] directions per ring, each snapped to its
//!    nearest cell.
//!
//! A cell is accepted only if it lies inside the arena, is free in the
//! occupancy map, and a bubble at its centre overlaps no resident. If nothing
//! within [`FALLBACK_RINGS`] rings passes, the resolver gives up rather than
//! return an overlapping cell.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::Vec2;

use super::collision::Contact;
use super::geometry::{Cell, distance};
use super::lattice::Lattice;
use crate::consts::{FALLBACK_ANGLES, FALLBACK_RINGS};
use crate::error::PlacementExhausted;

/// Find a safe cell for a shot that touched down at `contact`.
///
/// On success the returned cell is free and a bubble placed there overlaps no
/// resident.
pub fn resolve_placement(lattice: &Lattice, contact: &Contact) -> Result<Cell, PlacementExhausted> {
    let mut tried = HashSet::new();
    let point = contact.point;

    let direct = lattice.nearest_cell(point);
    if accept(lattice, direct, &mut tried) {
        return Ok(direct);
    }

    if let Some(reference) = contact.reference {
        let mut neighbors = lattice.neighbors_of(reference);
        neighbors.sort_by(|a, b| {
            let da = distance(point, lattice.world_position_of(*a));
            let db = distance(point, lattice.world_position_of(*b));
            da.total_cmp(&db).then_with(|| a.cmp(b))
        });
        if let Some(cell) = neighbors.into_iter().find(|c| accept(lattice, *c, &mut tried)) {
            log::debug!("direct snap {direct} rejected, using neighbour {cell} of {reference}");
            return Ok(cell);
        }
    }

    let spacing = lattice.spacing();
    for ring in 1..=FALLBACK_RINGS {
        let r = ring as f32 * spacing;
        for step in 0..FALLBACK_ANGLES {
            let theta = step as f32 * TAU / FALLBACK_ANGLES as f32;
            let candidate = point + Vec2::new(theta.cos(), theta.sin()) * r;
            let cell = lattice.nearest_cell(candidate);
            if accept(lattice, cell, &mut tried) {
                log::debug!("placement fell back to ring {ring}: {cell}");
                return Ok(cell);
            }
        }
    }

    log::warn!("placement exhausted around ({}, {})", point.x, point.y);
    Err(PlacementExhausted { contact: point })
}

/// Acceptance test shared by every search stage. Each cell is judged once.
fn accept(lattice: &Lattice, cell: Cell, tried: &mut HashSet<Cell>) -> bool {
    if !tried.insert(cell) {
        return false;
    }
    is_free_cell(lattice, cell)
}

/// Inside the arena, unoccupied, and clear of every resident
pub fn is_free_cell(lattice: &Lattice, cell: Cell) -> bool {
    lattice.in_bounds(cell)
        && !lattice.is_occupied(cell)
        && lattice.first_overlap(lattice.world_position_of(cell)).is_none()
}
