//! Bubble Arena - hex-lattice bubble shooter engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flight, collision, grid snapping, popping)
//! - `config`: Session configuration with validation
//! - `levels`: Built-in board layouts
//! - `error`: Error taxonomy shared by the modules above
//!
//! Rendering, input and audio live outside this crate. A presentation layer
//! drives a [`sim::GridSession`] with launch angles and `advance(dt)` calls
//! and renders whatever [`sim::GridSession::snapshot`] returns.

pub mod config;
pub mod error;
pub mod levels;
pub mod sim;

pub use config::SessionConfig;
pub use error::{ConfigError, InvariantViolation, PlacementExhausted, SessionError};
pub use levels::{Level, LevelPattern};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the original frame clock)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default bubble radius in pixels
    pub const BUBBLE_RADIUS: f32 = 20.0;
    /// Lattice spacing never drops below this multiple of the radius
    pub const MIN_SPACING_FACTOR: f32 = 2.1;
    /// Default lattice spacing
    pub const GRID_SPACING: f32 = 45.0;

    /// Default arena size
    pub const ARENA_WIDTH: f32 = 480.0;
    pub const ARENA_HEIGHT: f32 = 800.0;

    /// Shot speed in pixels per second
    pub const SHOT_SPEED: f32 = 400.0;
    /// Shots closer than this to horizontal are clamped (radians)
    pub const MIN_LAUNCH_ANGLE: f32 = 0.1;
    /// Hard cap on flight length before a shot is forced to settle
    pub const MAX_FLIGHT_TICKS: u32 = 60 * 30;
    /// Largest fraction of the radius a shot may travel in one substep
    pub const SUBSTEP_FRACTION: f32 = 0.25;

    /// Same-element component size that pops
    pub const POP_THRESHOLD: usize = 3;
    /// Score per bubble removed in a matched cluster
    pub const POINTS_PER_POP: u64 = 10;
    /// Score per bubble dropped as part of a floating group
    pub const POINTS_PER_DROP: u64 = 20;

    /// Fallback search: directions tried on each ring
    pub const FALLBACK_ANGLES: u32 = 12;
    /// Fallback search: rings tried, in multiples of the spacing
    pub const FALLBACK_RINGS: u32 = 5;
}

/// Unit direction for a launch angle in screen space (y grows downward).
///
/// Angles are counter-clockwise from +x as seen on screen, so `π/2` points
/// straight up.
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

/// Inverse of [`direction_from_angle`]
#[inline]
pub fn angle_of_direction(dir: Vec2) -> f32 {
    (-dir.y).atan2(dir.x)
}
