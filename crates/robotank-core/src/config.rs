//! Simulation configuration.
//!
//! A single immutable [`SimConfig`] is injected into
//! [`Scene::new`](crate::scene::Scene::new); nothing in the engine reads
//! process-wide constants. Every section has defaults matching the classic
//! 640x480 arena, so a JSON file only needs the fields it overrides:
//!
//! ```
//! use robotank_core::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "seed": 7, "tank": { "speed": 3.0 } }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert!((config.tank.speed - 3.0).abs() < f64::EPSILON);
//! assert!((config.field.width - 640.0).abs() < f64::EPSILON);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Playing field dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSize {
    /// Width in field units
    pub width: f64,
    /// Height in field units
    pub height: f64,
}

impl Default for FieldSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

/// Tank tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    /// Maximum speed per tick
    pub speed: f64,
    /// Degrees turned per tick
    pub turn_rate: f64,
    /// Collision and radar radius
    pub radius: f64,
    /// Armor at spawn and regeneration ceiling
    pub max_armor: f64,
    /// Armor regained per tick while below the ceiling
    pub armor_renewal_rate: f64,
    /// Gun heat at spawn
    pub gun_initial_heat: u32,
    /// Gun heat right after a shot
    pub gun_heat_after_fire: u32,
    /// Extra muzzle standoff beyond half the radius
    pub muzzle_offset: f64,
    /// Radar reach
    pub radar_range: f64,
    /// Full radar cone angle in degrees
    pub radar_angle: f64,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            turn_rate: 5.0,
            radius: 32.0,
            max_armor: 100.0,
            armor_renewal_rate: 0.1,
            gun_initial_heat: 8,
            gun_heat_after_fire: 80,
            muzzle_offset: 12.0,
            radar_range: 200.0,
            radar_angle: 40.0,
        }
    }
}

impl TankTuning {
    /// Distance from the tank centre to the muzzle.
    #[must_use]
    pub fn muzzle_standoff(&self) -> f64 {
        (self.radius / 2.0).floor() + self.muzzle_offset
    }
}

/// Projectile tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTuning {
    /// Speed per tick
    pub speed: f64,
    /// Armor removed on hit
    pub power: u32,
    /// Lifetime in ticks
    pub life: u32,
    /// Collision radius
    pub radius: f64,
}

impl Default for ShotTuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            power: 10,
            life: 60,
            radius: 4.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Field dimensions
    pub field: FieldSize,
    /// Tank tuning
    pub tank: TankTuning,
    /// Shot tuning
    pub shot: ShotTuning,
    /// Explosion lifetime in ticks
    pub explosion_life: u32,
    /// Ticks between heartbeat events
    pub heartbeat_interval: u32,
    /// Distance at which a `move_at` counts as arrived
    pub arrival_radius: f64,
    /// `move_in` targets this many heading lengths ahead
    pub far_target_factor: f64,
    /// Overlap tolerated between tanks before they are pushed apart
    pub collision_tolerance: f64,
    /// Inset used when picking random points
    pub spawn_margin: f64,
    /// Minimum wall-clock duration of one tick, in milliseconds
    pub tick_floor_ms: u64,
    /// Events one entity may handle in a single drain before the tick fails
    pub max_events_per_drain: usize,
    /// Seed for spawn positions and behavior randomness
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field: FieldSize::default(),
            tank: TankTuning::default(),
            shot: ShotTuning::default(),
            explosion_life: 12,
            heartbeat_interval: 5,
            arrival_radius: 5.0,
            far_target_factor: 100.0,
            collision_tolerance: 1.0,
            spawn_margin: 5.0,
            tick_floor_ms: 16,
            max_events_per_drain: 1024,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`SimConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Same configuration with a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Same configuration with a different tick floor.
    #[must_use]
    pub fn with_tick_floor(mut self, floor: Duration) -> Self {
        self.tick_floor_ms = u64::try_from(floor.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Minimum wall-clock duration of one tick.
    #[must_use]
    pub fn tick_floor(&self) -> Duration {
        Duration::from_millis(self.tick_floor_ms)
    }

    /// Half of the radar cone, in degrees.
    #[must_use]
    pub fn half_radar_angle(&self) -> f64 {
        self.tank.radar_angle / 2.0
    }

    /// Checks every value the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
            }
        }
        fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be non-negative, got {value}")))
            }
        }

        positive("field.width", self.field.width)?;
        positive("field.height", self.field.height)?;
        non_negative("tank.speed", self.tank.speed)?;
        positive("tank.turn_rate", self.tank.turn_rate)?;
        non_negative("tank.radius", self.tank.radius)?;
        positive("tank.max_armor", self.tank.max_armor)?;
        non_negative("tank.armor_renewal_rate", self.tank.armor_renewal_rate)?;
        non_negative("tank.muzzle_offset", self.tank.muzzle_offset)?;
        non_negative("tank.radar_range", self.tank.radar_range)?;
        if !(0.0..=360.0).contains(&self.tank.radar_angle) {
            return Err(ConfigError::invalid(
                "tank.radar_angle",
                format!("must be within [0, 360], got {}", self.tank.radar_angle),
            ));
        }
        non_negative("shot.speed", self.shot.speed)?;
        non_negative("shot.radius", self.shot.radius)?;
        non_negative("arrival_radius", self.arrival_radius)?;
        positive("far_target_factor", self.far_target_factor)?;
        non_negative("collision_tolerance", self.collision_tolerance)?;
        non_negative("spawn_margin", self.spawn_margin)?;
        if self.spawn_margin * 2.0 >= self.field.width.min(self.field.height) {
            return Err(ConfigError::invalid(
                "spawn_margin",
                "leaves no room on the field".to_string(),
            ));
        }
        if self.heartbeat_interval == 0 {
            return Err(ConfigError::invalid("heartbeat_interval", "must be at least 1".to_string()));
        }
        if self.max_events_per_drain == 0 {
            return Err(ConfigError::invalid("max_events_per_drain", "must be at least 1".to_string()));
        }
        Ok(())
    }
}
