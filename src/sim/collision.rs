//! Collision detection for the bubble in flight
//!
//! A shot moves through Flying -> Settling -> Attached. Each tick is split
//! into substeps no longer than a fraction of the radius so a fast shot
//! cannot tunnel through a resident bubble between two positions.

use glam::Vec2;

use super::bubble::{Bubble, BubbleStatus};
use super::geometry::{Cell, distance};
use super::lattice::Lattice;
use crate::consts::SUBSTEP_FRACTION;

/// Where and against what a shot stopped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Shot centre at the moment of contact
    pub point: Vec2,
    /// Resident bubble that was hit; `None` for the top wall or a forced settle
    pub reference: Option<Cell>,
}

/// Lifecycle of a single shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotPhase {
    Flying,
    /// Touched something; waiting for the placement resolver
    Settling(Contact),
    /// Fixed to the lattice
    Attached(Cell),
}

/// The bubble in flight plus its phase
#[derive(Debug, Clone)]
pub struct Shot {
    pub bubble: Bubble,
    pub phase: ShotPhase,
    /// Ticks spent flying
    pub ticks: u32,
}

impl Shot {
    pub fn new(bubble: Bubble) -> Self {
        Self {
            bubble,
            phase: ShotPhase::Flying,
            ticks: 0,
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.phase, ShotPhase::Flying)
    }
}

/// Advance a flying shot by `dt`.
///
/// Returns the contact once the shot touches a resident bubble or the top
/// wall, or once it has been flying for `max_ticks` ticks. The shot is left in
/// [`ShotPhase::Settling`] in that case. Side walls (and the bottom wall, for
/// completeness) reflect the velocity without losing speed.
pub fn step_shot(shot: &mut Shot, lattice: &Lattice, dt: f32, max_ticks: u32) -> Option<Contact> {
    if !shot.is_flying() {
        return None;
    }
    let BubbleStatus::Flying { mut vel } = shot.bubble.status else {
        return None;
    };

    let radius = shot.bubble.radius;
    let arena = *lattice.arena();
    let travel = vel.length() * dt;
    let substeps = (travel / (radius * SUBSTEP_FRACTION)).ceil().max(1.0) as u32;
    let sub_dt = dt / substeps as f32;

    let mut contact = None;
    for _ in 0..substeps {
        let mut pos = shot.bubble.pos + vel * sub_dt;

        if pos.x - radius < 0.0 {
            pos.x = radius;
            vel.x = vel.x.abs();
        } else if pos.x + radius > arena.width {
            pos.x = arena.width - radius;
            vel.x = -vel.x.abs();
        }
        if pos.y + radius > arena.height {
            pos.y = arena.height - radius;
            vel.y = -vel.y.abs();
        }

        shot.bubble.pos = pos;

        if let Some(hit) = closest_overlap(lattice, pos, radius) {
            contact = Some(Contact {
                point: pos,
                reference: Some(hit),
            });
            break;
        }

        if pos.y - radius <= 0.0 {
            shot.bubble.pos.y = radius;
            contact = Some(Contact {
                point: shot.bubble.pos,
                reference: None,
            });
            break;
        }
    }

    shot.bubble.status = BubbleStatus::Flying { vel };
    shot.ticks += 1;

    if contact.is_none() && shot.ticks >= max_ticks {
        log::warn!(
            "shot {} still flying after {} ticks, forcing settle",
            shot.bubble.id,
            shot.ticks
        );
        contact = Some(Contact {
            point: shot.bubble.pos,
            reference: None,
        });
    }

    if let Some(contact) = contact {
        shot.phase = ShotPhase::Settling(contact);
    }
    contact
}

/// Cell of the closest resident overlapping a circle at `pos`
fn closest_overlap(lattice: &Lattice, pos: Vec2, radius: f32) -> Option<Cell> {
    lattice
        .iter()
        .map(|(cell, r)| (cell, distance(pos, r.pos), r.radius))
        .filter(|&(_, d, r)| d < radius + r)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(cell, _, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Arena, BubbleId, Element, HexLayout};

    fn lattice() -> Lattice {
        Lattice::new(
            HexLayout::new(44.0, Vec2::new(20.0, 20.0)),
            Arena::new(400.0, 600.0),
            20.0,
        )
    }

    fn shot(pos: Vec2, vel: Vec2) -> Shot {
        Shot::new(Bubble::flying(BubbleId(99), Element::Fire, pos, 20.0, vel))
    }

    #[test]
    fn test_flying_moves_by_velocity() {
        let lattice = lattice();
        let mut shot = shot(Vec2::new(200.0, 500.0), Vec2::new(0.0, -100.0));
        assert!(step_shot(&mut shot, &lattice, 0.1, 1000).is_none());
        assert!((shot.bubble.pos.y - 490.0).abs() < 1e-3);
        assert!(shot.is_flying());
        assert_eq!(shot.ticks, 1);
    }

    #[test]
    fn test_side_wall_reflects_x_only() {
        let lattice = lattice();
        let mut shot = shot(Vec2::new(375.0, 500.0), Vec2::new(100.0, -100.0));
        step_shot(&mut shot, &lattice, 0.1, 1000);
        let vel = shot.bubble.velocity().unwrap();
        assert!(vel.x < 0.0);
        assert!(vel.y < 0.0);
        assert!((vel.length() - Vec2::new(100.0, 100.0).length()).abs() < 1e-3);
        assert!(shot.bubble.pos.x + 20.0 <= 400.0);
    }

    #[test]
    fn test_top_wall_settles_without_reference() {
        let lattice = lattice();
        let mut shot = shot(Vec2::new(200.0, 30.0), Vec2::new(0.0, -400.0));
        let contact = step_shot(&mut shot, &lattice, 0.1, 1000).unwrap();
        assert_eq!(contact.reference, None);
        assert!((contact.point.y - 20.0).abs() < 1e-3);
        assert_eq!(shot.phase, ShotPhase::Settling(contact));
    }

    #[test]
    fn test_resident_contact_reports_reference() {
        let mut lattice = lattice();
        let target = Cell::new(0, 4);
        let id = BubbleId(1);
        lattice.place(target, Bubble::resident(id, Element::Water, Vec2::ZERO, 20.0, target));
        let above = lattice.world_position_of(target);

        let mut shot = shot(Vec2::new(above.x, 400.0), Vec2::new(0.0, -400.0));
        let mut contact = None;
        for _ in 0..100 {
            contact = step_shot(&mut shot, &lattice, 1.0 / 60.0, 1000);
            if contact.is_some() {
                break;
            }
        }
        let contact = contact.unwrap();
        assert_eq!(contact.reference, Some(target));
        // Contact is reported at the shot's position, not the resident's
        let gap = distance(contact.point, above);
        assert!(gap < 40.0 && gap > 30.0, "gap {gap}");
    }

    #[test]
    fn test_forced_settle_after_max_ticks() {
        let lattice = lattice();
        let mut shot = shot(Vec2::new(200.0, 300.0), Vec2::new(50.0, 0.0));
        for _ in 0..4 {
            assert!(step_shot(&mut shot, &lattice, 0.1, 5).is_none());
        }
        let contact = step_shot(&mut shot, &lattice, 0.1, 5).unwrap();
        assert_eq!(contact.reference, None);
        assert!(!shot.is_flying());
        assert!(step_shot(&mut shot, &lattice, 0.1, 5).is_none());
    }
}
