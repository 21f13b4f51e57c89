//! Tank gun reload cycle.

use planar::{Point, Vector};
use serde::{Deserialize, Serialize};

use crate::config::TankTuning;

/// Whether the gun can fire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GunState {
    /// Cooling down; heat counts toward zero
    Reloading,
    /// Ready to fire
    Loaded,
}

/// Where and in which direction a new shot starts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Muzzle {
    /// Launch position
    pub point: Point,
    /// Launch direction in degrees
    pub course: f64,
}

/// A tank's gun. Owned by exactly one tank.
///
/// # Example
///
/// ```
/// use robotank_core::gun::{Gun, GunState};
///
/// let gun = Gun::new(2);
/// assert_eq!(gun.state(), GunState::Reloading);
/// assert_eq!(gun.heat(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gun {
    heat: u32,
    state: GunState,
}

impl Gun {
    /// A gun that starts reloading with `initial_heat` ticks to go.
    #[must_use]
    pub const fn new(initial_heat: u32) -> Self {
        Self {
            heat: initial_heat,
            state: GunState::Reloading,
        }
    }

    /// Ticks left until loaded.
    #[must_use]
    pub const fn heat(&self) -> u32 {
        self.heat
    }

    /// Reload state.
    #[must_use]
    pub const fn state(&self) -> GunState {
        self.state
    }

    /// True when the next `fire` will launch a shot.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, GunState::Loaded)
    }

    /// Advances the reload by one tick. Returns true on the tick the gun
    /// becomes loaded.
    pub(crate) fn step(&mut self) -> bool {
        if self.state != GunState::Reloading {
            return false;
        }
        self.heat = self.heat.saturating_sub(1);
        if self.heat == 0 {
            self.state = GunState::Loaded;
            return true;
        }
        false
    }

    /// Fires from `origin` along `course` if loaded.
    ///
    /// The muzzle sits `floor(radius / 2) + muzzle_offset` ahead of the tank
    /// centre. Returns `None` while reloading.
    pub(crate) fn fire(&mut self, origin: Point, course: f64, tuning: &TankTuning) -> Option<Muzzle> {
        if !self.is_loaded() {
            return None;
        }
        self.heat = tuning.gun_heat_after_fire;
        self.state = GunState::Reloading;
        Some(Muzzle {
            point: origin + Vector::from_direction(course, tuning.muzzle_standoff()),
            course,
        })
    }
}
