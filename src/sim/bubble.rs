//! Bubble entities and element tags

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Cell;

/// Element tag. Bubbles of the same element match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Air];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Earth => "Earth",
            Element::Air => "Air",
        }
    }
}

/// Stable bubble identity, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bubble lifecycle: Flying -> Resident -> Removed, each at most once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleStatus {
    /// In transit after a shot
    Flying { vel: Vec2 },
    /// Fixed to a lattice cell
    Resident { cell: Cell },
    /// Popped or dropped
    Removed,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub element: Element,
    pub pos: Vec2,
    pub radius: f32,
    pub status: BubbleStatus,
}

impl Bubble {
    /// A bubble already fixed at `cell`, centred at `pos`
    pub fn resident(id: BubbleId, element: Element, pos: Vec2, radius: f32, cell: Cell) -> Self {
        Self {
            id,
            element,
            pos,
            radius,
            status: BubbleStatus::Resident { cell },
        }
    }

    /// A bubble in flight from `pos` with velocity `vel`
    pub fn flying(id: BubbleId, element: Element, pos: Vec2, radius: f32, vel: Vec2) -> Self {
        Self {
            id,
            element,
            pos,
            radius,
            status: BubbleStatus::Flying { vel },
        }
    }

    /// Lattice cell, if resident
    pub fn cell(&self) -> Option<Cell> {
        match self.status {
            BubbleStatus::Resident { cell } => Some(cell),
            _ => None,
        }
    }

    /// Velocity, if flying
    pub fn velocity(&self) -> Option<Vec2> {
        match self.status {
            BubbleStatus::Flying { vel } => Some(vel),
            _ => None,
        }
    }

    #[inline]
    pub fn matches_element(&self, other: &Bubble) -> bool {
        self.element == other.element
    }
}
