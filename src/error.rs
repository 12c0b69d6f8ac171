//! Error taxonomy for sessions, configuration and placement

use glam::Vec2;

use crate::sim::{BubbleId, Cell, Element};

/// Rejected session configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bubble radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("arena must have positive size, got {width}x{height}")]
    NonPositiveArena { width: f32, height: f32 },
    #[error("at least one element must be enabled")]
    NoElementsEnabled,
    #[error("shot speed must be positive, got {0}")]
    NonPositiveShotSpeed(f32),
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a shot could not be fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a shot is already in flight")]
    ShotInFlight,
    #[error("session is over")]
    SessionOver,
    #[error("element {0:?} is not enabled for this session")]
    ElementDisabled(Element),
    #[error("launch angle must be finite")]
    NonFiniteAngle,
}

/// No free, non-overlapping cell near the contact point.
///
/// The board is effectively full around the shot; the session treats this as
/// a loss rather than forcing an overlapping placement.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("no valid cell near {contact}")]
pub struct PlacementExhausted {
    pub contact: Vec2,
}

/// Broken board invariant. Any of these is a bug in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("bubbles {a} and {b} overlap")]
    Overlap { a: BubbleId, b: BubbleId },
    #[error("bubble at {cell} is not at its cell centre")]
    PositionMismatch { cell: Cell },
    #[error("bubble at {cell} is not marked resident at that cell")]
    StatusMismatch { cell: Cell },
}
