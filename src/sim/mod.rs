//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (lattice cells ordered by row, then column)
//! - No rendering or platform dependencies

pub mod bubble;
pub mod cluster;
pub mod collision;
pub mod geometry;
pub mod lattice;
pub mod placement;
pub mod session;

pub use bubble::{Bubble, BubbleId, BubbleStatus, Element};
pub use cluster::{PopOutcome, find_cluster, find_floating, pop_from};
pub use collision::{Contact, Shot, ShotPhase, step_shot};
pub use geometry::{Cell, HexLayout, distance, nearest_cell, overlaps};
pub use lattice::{Arena, Lattice};
pub use placement::{is_free_cell, resolve_placement};
pub use session::{GridSession, LayoutEntry, SessionPhase, ShotHandle, TickResult};
