//! Grid session: owns one game's board and its shot in flight
//!
//! The presentation layer holds a `GridSession` and calls `fire`, then
//! `advance(dt)` once per frame until the shot settles, rendering `snapshot()`
//! and `flying()` in between. Nothing here is global; sessions are
//! independent values.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleId, BubbleStatus, Element};
use super::cluster::pop_from;
use super::collision::{Shot, ShotPhase, step_shot};
use super::geometry::{Cell, circles_overlap};
use super::lattice::Lattice;
use super::placement::{is_free_cell, resolve_placement};
use crate::config::SessionConfig;
use crate::consts::MIN_LAUNCH_ANGLE;
use crate::direction_from_angle;
use crate::error::{ConfigError, InvariantViolation, SessionError};
use crate::levels::Level;

/// Tolerance when comparing a resident's position to its cell centre
const POSITION_TOLERANCE: f32 = 1e-3;

/// One bubble of a starting board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub cell: Cell,
    pub element: Element,
}

impl LayoutEntry {
    pub fn new(row: i32, col: i32, element: Element) -> Self {
        Self {
            cell: Cell::new(row, col),
            element,
        }
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the next shot
    Aiming,
    /// A shot is in flight
    Flying,
    /// Board cleared
    Won,
    /// Out of shots, or no room left to place a bubble
    Lost,
}

impl SessionPhase {
    pub fn is_over(&self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

/// Identifies the bubble a `fire` call launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShotHandle(pub BubbleId);

impl ShotHandle {
    pub fn id(&self) -> BubbleId {
        self.0
    }
}

/// Outcome of one `advance` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    /// No shot in flight
    Idle,
    StillFlying,
    /// The shot attached at `cell`; `removed` lists popped then dropped bubbles
    Settled { cell: Cell, removed: Vec<BubbleId> },
    /// Nowhere to put the shot; the session is lost
    PlacementExhausted,
}

/// A single game instance
#[derive(Debug, Clone)]
pub struct GridSession {
    config: SessionConfig,
    lattice: Lattice,
    shot: Option<Shot>,
    rng: Pcg32,
    queued: Element,
    phase: SessionPhase,
    score: u64,
    shots_fired: u32,
    time_ticks: u64,
    next_id: u32,
}

impl GridSession {
    /// Start a session from a config and a starting board.
    ///
    /// Layout entries that fall outside the arena, repeat a cell, or would
    /// overlap an earlier entry are skipped.
    pub fn start(config: SessionConfig, initial_layout: &[LayoutEntry]) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let lattice = Lattice::new(config.layout(), config.arena(), config.radius);
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let queued = config.elements[rng.random_range(0..config.elements.len())];

        let mut session = Self {
            config,
            lattice,
            shot: None,
            rng,
            queued,
            phase: SessionPhase::Aiming,
            score: 0,
            shots_fired: 0,
            time_ticks: 0,
            next_id: 1,
        };

        let mut skipped = 0;
        for entry in initial_layout {
            if !session.add_initial(*entry) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::warn!("skipped {skipped} layout entries that could not be placed cleanly");
        }
        log::info!(
            "session started: {}x{} arena, spacing {}, {} residents",
            session.config.arena_width,
            session.config.arena_height,
            session.config.spacing,
            session.lattice.len()
        );
        Ok(session)
    }

    /// Start with the given arena and bubble geometry and default tunables
    pub fn start_session(
        arena_width: f32,
        arena_height: f32,
        radius: f32,
        spacing: f32,
        initial_layout: &[LayoutEntry],
    ) -> Result<Self, ConfigError> {
        Self::start(
            SessionConfig::new(arena_width, arena_height, radius, spacing),
            initial_layout,
        )
    }

    /// Start a built-in or custom level. The level's shot budget replaces the
    /// config's.
    pub fn from_level(mut config: SessionConfig, level: &Level) -> Result<Self, ConfigError> {
        config.max_shots = Some(level.max_shots);
        let layout = level.layout(&config.elements, config.seed);
        log::info!("loading {} ({:?}, {} shots)", level.name, level.pattern, level.max_shots);
        Self::start(config, &layout)
    }

    fn next_entity_id(&mut self) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        id
    }

    fn add_initial(&mut self, entry: LayoutEntry) -> bool {
        if !is_free_cell(&self.lattice, entry.cell) {
            return false;
        }
        let id = self.next_entity_id();
        let pos = self.lattice.world_position_of(entry.cell);
        let bubble = Bubble::resident(id, entry.element, pos, self.config.radius, entry.cell);
        self.lattice.place(entry.cell, bubble);
        true
    }

    /// Launch a bubble of `element` at `angle` radians (π/2 is straight up).
    ///
    /// The angle is clamped so the shot always has an upward component.
    pub fn fire(&mut self, angle: f32, element: Element) -> Result<ShotHandle, SessionError> {
        match self.phase {
            SessionPhase::Flying => return Err(SessionError::ShotInFlight),
            SessionPhase::Won | SessionPhase::Lost => return Err(SessionError::SessionOver),
            SessionPhase::Aiming => {}
        }
        if self.shots_remaining() == Some(0) {
            return Err(SessionError::SessionOver);
        }
        if !angle.is_finite() {
            return Err(SessionError::NonFiniteAngle);
        }
        if !self.config.is_enabled(element) {
            return Err(SessionError::ElementDisabled(element));
        }

        let angle = angle.clamp(MIN_LAUNCH_ANGLE, std::f32::consts::PI - MIN_LAUNCH_ANGLE);
        let vel = direction_from_angle(angle) * self.config.shot_speed;
        let id = self.next_entity_id();
        let bubble = Bubble::flying(id, element, self.config.launcher(), self.config.radius, vel);

        log::debug!("fired {id} ({}) at {angle:.3} rad", element.as_str());
        self.shot = Some(Shot::new(bubble));
        self.shots_fired += 1;
        self.phase = SessionPhase::Flying;
        Ok(ShotHandle(id))
    }

    /// Launch the queued element and draw the next one
    pub fn fire_queued(&mut self, angle: f32) -> Result<ShotHandle, SessionError> {
        let handle = self.fire(angle, self.queued)?;
        self.queued = self.draw_element();
        Ok(handle)
    }

    fn draw_element(&mut self) -> Element {
        let elements = &self.config.elements;
        elements[self.rng.random_range(0..elements.len())]
    }

    /// Drop the shot in flight without touching the board. The shot is not
    /// counted against the budget.
    pub fn cancel_shot(&mut self) -> Option<Bubble> {
        let shot = self.shot.take()?;
        self.shots_fired = self.shots_fired.saturating_sub(1);
        self.phase = SessionPhase::Aiming;
        log::debug!("shot {} cancelled", shot.bubble.id);
        Some(shot.bubble)
    }

    /// Advance the shot in flight by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> TickResult {
        let Some(shot) = self.shot.as_mut() else {
            return TickResult::Idle;
        };
        self.time_ticks += 1;

        let Some(contact) = step_shot(shot, &self.lattice, dt, self.config.max_flight_ticks) else {
            return TickResult::StillFlying;
        };

        let cell = match resolve_placement(&self.lattice, &contact) {
            Ok(cell) => cell,
            Err(err) => {
                log::info!("{err}; session lost");
                self.shot = None;
                self.phase = SessionPhase::Lost;
                return TickResult::PlacementExhausted;
            }
        };

        let Some(mut shot) = self.shot.take() else {
            return TickResult::Idle;
        };
        shot.phase = ShotPhase::Attached(cell);
        let id = self.lattice.place(cell, shot.bubble);
        log::debug!("{id} settled at {cell}");

        let outcome = pop_from(&mut self.lattice, cell, self.config.pop_threshold);
        self.score += outcome.matched.len() as u64 * self.config.points_per_pop
            + outcome.dropped.len() as u64 * self.config.points_per_drop;

        self.phase = if self.lattice.is_empty() {
            log::info!("board cleared, score {}", self.score);
            SessionPhase::Won
        } else if self.shots_remaining() == Some(0) {
            log::info!("out of shots, score {}", self.score);
            SessionPhase::Lost
        } else {
            SessionPhase::Aiming
        };

        TickResult::Settled {
            cell,
            removed: outcome.removed(),
        }
    }

    /// Residents as `(cell, element)`, ordered by row then column
    pub fn snapshot(&self) -> Vec<(Cell, Element)> {
        self.lattice.iter().map(|(cell, b)| (cell, b.element)).collect()
    }

    /// The bubble in flight, if any
    pub fn flying(&self) -> Option<&Bubble> {
        self.shot.as_ref().map(|s| &s.bubble)
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn queued_element(&self) -> Element {
        self.queued
    }

    pub fn launcher(&self) -> Vec2 {
        self.config.launcher()
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// `None` when the session has no shot budget
    pub fn shots_remaining(&self) -> Option<u32> {
        self.config
            .max_shots
            .map(|max| max.saturating_sub(self.shots_fired))
    }

    /// Ticks spent with a shot in flight
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Check the board invariants: each resident sits at its own cell centre
    /// and no two residents overlap.
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        let residents: Vec<(Cell, &Bubble)> = self.lattice.iter().collect();
        for (i, &(cell, bubble)) in residents.iter().enumerate() {
            if bubble.status != (BubbleStatus::Resident { cell }) {
                return Err(InvariantViolation::StatusMismatch { cell });
            }
            if bubble.pos.distance(self.lattice.world_position_of(cell)) > POSITION_TOLERANCE {
                return Err(InvariantViolation::PositionMismatch { cell });
            }
            for &(_, other) in &residents[i + 1..] {
                if circles_overlap(bubble.pos, bubble.radius, other.pos, other.radius) {
                    return Err(InvariantViolation::Overlap {
                        a: bubble.id,
                        b: other.id,
                    });
                }
            }
        }
        Ok(())
    }
}
