//! Session configuration
//!
//! Every field has a default, so a JSON config only needs the values it wants
//! to change. [`SessionConfig::validated`] turns a raw config into the
//! effective one a session runs with.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Arena, Element, HexLayout};

/// Tunables for one grid session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Radius shared by every bubble
    pub radius: f32,
    /// Requested lattice spacing; raised to `2.1 * radius` if smaller
    pub spacing: f32,
    /// Centre of cell (0, 0); defaults to `(radius, radius)`
    pub grid_origin: Option<Vec2>,
    /// Where shots start; defaults to bottom centre
    pub launcher: Option<Vec2>,
    /// Elements that may appear on the board and in the queue
    pub elements: Vec<Element>,
    /// Shot speed in pixels per second
    pub shot_speed: f32,
    pub pop_threshold: usize,
    pub points_per_pop: u64,
    pub points_per_drop: u64,
    /// Shots allowed before the session is lost; `None` for unlimited
    pub max_shots: Option<u32>,
    /// Seed for the element queue
    pub seed: u64,
    pub max_flight_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            radius: BUBBLE_RADIUS,
            spacing: GRID_SPACING,
            grid_origin: None,
            launcher: None,
            elements: Element::ALL.to_vec(),
            shot_speed: SHOT_SPEED,
            pop_threshold: POP_THRESHOLD,
            points_per_pop: POINTS_PER_POP,
            points_per_drop: POINTS_PER_DROP,
            max_shots: None,
            seed: 0,
            max_flight_ticks: MAX_FLIGHT_TICKS,
        }
    }
}

impl SessionConfig {
    /// Config for an arena of the given size with the given radius and spacing
    pub fn new(arena_width: f32, arena_height: f32, radius: f32, spacing: f32) -> Self {
        Self {
            arena_width,
            arena_height,
            radius,
            spacing,
            ..Self::default()
        }
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Smallest spacing allowed for this radius
    pub fn min_spacing(&self) -> f32 {
        self.radius * MIN_SPACING_FACTOR
    }

    /// Check the config and return the effective one.
    ///
    /// Spacing below `2.1 * radius` is raised to that minimum rather than
    /// rejected. Duplicate elements are removed.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(ConfigError::NonPositiveArena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if !(self.shot_speed > 0.0) {
            return Err(ConfigError::NonPositiveShotSpeed(self.shot_speed));
        }

        self.elements.sort();
        self.elements.dedup();
        if self.elements.is_empty() {
            return Err(ConfigError::NoElementsEnabled);
        }

        let min_spacing = self.min_spacing();
        if !(self.spacing >= min_spacing) {
            log::warn!(
                "grid spacing {} below minimum {min_spacing} for radius {}, clamping",
                self.spacing,
                self.radius
            );
            self.spacing = min_spacing;
        }

        self.pop_threshold = self.pop_threshold.max(1);
        self.max_flight_ticks = self.max_flight_ticks.max(1);
        Ok(self)
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    pub fn layout(&self) -> HexLayout {
        let origin = self
            .grid_origin
            .unwrap_or(Vec2::new(self.radius, self.radius));
        HexLayout::new(self.spacing, origin)
    }

    pub fn launcher(&self) -> Vec2 {
        self.launcher.unwrap_or(Vec2::new(
            self.arena_width * 0.5,
            self.arena_height - self.radius * 2.0,
        ))
    }

    pub fn is_enabled(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_equal_to_radius_is_clamped() {
        let config = SessionConfig::new(400.0, 600.0, 20.0, 20.0).validated().unwrap();
        assert!(config.spacing >= 2.1 * 20.0 - 1e-4);
    }

    #[test]
    fn test_spacing_above_minimum_is_kept() {
        let config = SessionConfig::new(400.0, 600.0, 20.0, 44.0).validated().unwrap();
        assert_eq!(config.spacing, 44.0);
    }

    #[test]
    fn test_rejects_bad_radius_and_arena() {
        assert!(matches!(
            SessionConfig::new(400.0, 600.0, 0.0, 44.0).validated(),
            Err(ConfigError::NonPositiveRadius(_))
        ));
        assert!(matches!(
            SessionConfig::new(400.0, -1.0, 20.0, 44.0).validated(),
            Err(ConfigError::NonPositiveArena { .. })
        ));
        assert!(matches!(
            SessionConfig::new(400.0, 600.0, f32::NAN, 44.0).validated(),
            Err(ConfigError::NonPositiveRadius(_))
        ));
    }

    #[test]
    fn test_rejects_empty_element_set() {
        let config = SessionConfig {
            elements: Vec::new(),
            ..SessionConfig::default()
        };
        assert!(matches!(config.validated(), Err(ConfigError::NoElementsEnabled)));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SessionConfig::from_json(
            r#"{ "radius": 15.0, "elements": ["Fire", "Air", "Fire"], "max_shots": 12 }"#,
        )
        .unwrap()
        .validated()
        .unwrap();
        assert_eq!(config.radius, 15.0);
        assert_eq!(config.elements, vec![Element::Fire, Element::Air]);
        assert_eq!(config.max_shots, Some(12));
        assert_eq!(config.arena_width, ARENA_WIDTH);
        assert!(config.is_enabled(Element::Air));
        assert!(!config.is_enabled(Element::Water));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(
            SessionConfig::from_json("{ radius: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_default_layout_touches_top_left() {
        let config = SessionConfig::default();
        assert_eq!(config.layout().origin, Vec2::new(BUBBLE_RADIUS, BUBBLE_RADIUS));
        let launcher = config.launcher();
        assert_eq!(launcher.x, ARENA_WIDTH * 0.5);
    }
}
