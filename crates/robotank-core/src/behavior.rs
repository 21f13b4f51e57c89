//! Tank behaviors and the control handle they act through.
//!
//! A [`Behavior`] reacts to the events a tank receives. Every hook has a
//! do-nothing default, so a behavior overrides only what it cares about. Hooks
//! get a [`TankControl`], which can steer and fire the tank being handled and
//! read (but not change) the rest of the arena.
//!
//! # Example
//!
//! ```
//! use robotank_core::behavior::{Behavior, HookResult, TankControl};
//! use robotank_core::config::SimConfig;
//! use robotank_core::entity::TankSpec;
//! use robotank_core::scene::Scene;
//!
//! /// Spins in place and shoots whenever it can.
//! struct Turret;
//!
//! impl Behavior for Turret {
//!     fn on_born(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
//!         let course = ctl.tank().course();
//!         ctl.turn_to(course + 90.0)?;
//!         Ok(())
//!     }
//!
//!     fn on_stopped(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
//!         self.on_born(ctl)
//!     }
//!
//!     fn on_gun_reloaded(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
//!         ctl.fire();
//!         Ok(())
//!     }
//! }
//!
//! let mut scene = Scene::new(SimConfig::default()).unwrap();
//! scene.spawn_tank(TankSpec::default().at((320.0, 240.0)), Turret).unwrap();
//! for _ in 0..20 {
//!     scene.tick().unwrap();
//! }
//! assert_eq!(scene.shot_count(), 1);
//! ```

use std::fmt;

use planar::{GeometryError, Point, Vector};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::SimConfig;
use crate::entity::{EntityId, IdAllocator, Shot, Tank, Target};
use crate::error::{SceneError, TargetError};
use crate::scene::random_point;
use crate::world_view::{DistanceCache, WorldView};

/// Result of a behavior hook. An error stops the tick.
pub type HookResult = Result<(), SceneError>;

/// Reactions of one tank to its events.
pub trait Behavior {
    /// Name used in logs.
    fn name(&self) -> &'static str {
        "behavior"
    }

    /// The tank was just spawned.
    fn on_born(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        Ok(())
    }

    /// The tank came to rest.
    fn on_stopped(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        Ok(())
    }

    /// The tank reached the point given to `move_at`.
    fn on_stopped_at_target_point(&mut self, _ctl: &mut TankControl<'_>, _point: Point) -> HookResult {
        Ok(())
    }

    /// The gun is loaded.
    fn on_gun_reloaded(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        Ok(())
    }

    /// A shot hit the tank.
    fn on_hit(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        Ok(())
    }

    /// The tank bumped into `other`.
    fn on_collide(&mut self, _ctl: &mut TankControl<'_>, _other: EntityId) -> HookResult {
        Ok(())
    }

    /// A shot fired by this tank destroyed its target.
    fn on_target_destroyed(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        Ok(())
    }

    /// Tanks inside the radar cone this tick.
    fn on_radar_detect(&mut self, _ctl: &mut TankControl<'_>, _detected: &[EntityId]) -> HookResult {
        Ok(())
    }

    /// Periodic tick.
    fn on_heartbeat(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        Ok(())
    }
}

// =============================================================================
// TankControl
// =============================================================================

/// Handle a behavior uses to drive its tank.
pub struct TankControl<'a> {
    tank: &'a mut Tank,
    world: WorldView<'a>,
    launched: &'a mut Vec<Shot>,
    ids: &'a mut IdAllocator,
    rng: &'a mut ChaCha8Rng,
    distances: &'a mut DistanceCache,
    config: &'a SimConfig,
    debug: bool,
}

impl fmt::Debug for TankControl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TankControl")
            .field("tank", &self.tank.id())
            .field("tick", &self.world.tick())
            .field("launched", &self.launched.len())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl<'a> TankControl<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        tank: &'a mut Tank,
        world: WorldView<'a>,
        launched: &'a mut Vec<Shot>,
        ids: &'a mut IdAllocator,
        rng: &'a mut ChaCha8Rng,
        distances: &'a mut DistanceCache,
        config: &'a SimConfig,
        debug: bool,
    ) -> Self {
        Self {
            tank,
            world,
            launched,
            ids,
            rng,
            distances,
            config,
            debug,
        }
    }

    /// Id of the controlled tank.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.tank.id()
    }

    /// The controlled tank.
    #[must_use]
    pub fn tank(&self) -> &Tank {
        &*self.tank
    }

    /// Every other live entity.
    #[must_use]
    pub const fn world(&self) -> &WorldView<'a> {
        &self.world
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        self.config
    }

    /// The scene's seeded RNG, for behaviors that need randomness.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut *self.rng
    }

    /// A random point on the field, inset by the spawn margin.
    pub fn random_point(&mut self) -> Point {
        random_point(self.rng, self.config.field, self.config.spawn_margin)
    }

    fn position_of(&self, id: EntityId) -> Result<Point, TargetError> {
        if id == self.tank.id() {
            return Ok(self.tank.coord());
        }
        self.world
            .position_of(id)
            .ok_or(TargetError::UnknownEntity(id))
    }

    /// Turn in place toward a point, an entity or an absolute angle.
    /// Cancels any pending move.
    ///
    /// # Errors
    ///
    /// [`TargetError::UnknownEntity`] when the target entity is gone and
    /// [`TargetError::Geometry`] for a NaN or infinite angle or point.
    pub fn turn_to(&mut self, target: impl Into<Target>) -> Result<(), TargetError> {
        match target.into() {
            Target::Angle(angle) => {
                Vector::try_from_direction(angle, 0.0)?;
                self.tank.body_mut().turn_to_angle(angle);
            }
            Target::Point(point) => {
                let point = finite(point)?;
                self.tank.body_mut().turn_toward(point);
            }
            Target::Entity(id) => {
                let point = self.position_of(id)?;
                self.tank.body_mut().turn_toward(point);
            }
        }
        Ok(())
    }

    /// Drive along `direction` degrees at up to `speed` per tick until
    /// stopped by a command or the field edge.
    ///
    /// # Errors
    ///
    /// [`TargetError::Geometry`] for a NaN or infinite direction or speed.
    pub fn move_in(&mut self, direction: f64, speed: f64) -> Result<(), TargetError> {
        Vector::try_from_direction(direction, speed)?;
        self.tank
            .body_mut()
            .move_in(direction, speed, self.config.far_target_factor);
        Ok(())
    }

    /// Drive toward a point or entity at up to `speed` per tick and stop on
    /// arrival. Entity targets are resolved to their current position once.
    ///
    /// # Errors
    ///
    /// [`TargetError::Unsupported`] for angle targets,
    /// [`TargetError::UnknownEntity`] when the target entity is gone and
    /// [`TargetError::Geometry`] for a NaN or infinite point or speed.
    pub fn move_at(&mut self, target: impl Into<Target>, speed: f64) -> Result<(), TargetError> {
        Vector::try_from_direction(0.0, speed)?;
        let point = match target.into() {
            Target::Point(point) => finite(point)?,
            Target::Entity(id) => self.position_of(id)?,
            Target::Angle(_) => {
                return Err(TargetError::Unsupported {
                    operation: "move_at",
                    given: "angle",
                    accepted: "point or entity",
                })
            }
        };
        self.tank.body_mut().move_at(point, speed);
        Ok(())
    }

    /// Stop now.
    pub fn stop(&mut self) {
        self.tank.body_mut().stop();
    }

    /// Fire the gun. Returns the new shot, or `None` while reloading.
    pub fn fire(&mut self) -> Option<EntityId> {
        let owner = self.tank.id();
        let origin = self.tank.coord();
        let course = self.tank.course();
        let muzzle = self
            .tank
            .gun_mut()
            .fire(origin, course, &self.config.tank)?;
        let id = self.ids.next_id();
        self.launched
            .push(Shot::launch(id, muzzle, Some(owner), self.config));
        self.tank.shot = Some(id);
        if self.debug {
            debug!(tank = %owner, shot = %id, course, "fire");
        }
        Some(id)
    }

    /// Distance from the controlled tank to a point or entity.
    ///
    /// Tank-to-tank distances come from the per-tick cache filled while
    /// resolving collisions.
    ///
    /// # Errors
    ///
    /// [`TargetError::Unsupported`] for angle targets and
    /// [`TargetError::UnknownEntity`] when the target entity is gone.
    pub fn distance_to(&mut self, target: impl Into<Target>) -> Result<f64, TargetError> {
        let own = self.tank.id();
        match target.into() {
            Target::Point(point) => Ok(self.tank.coord().distance_to(finite(point)?)),
            Target::Entity(id) => {
                if let Some(cached) = self.distances.get(own, id) {
                    return Ok(cached);
                }
                let distance = self.tank.coord().distance_to(self.position_of(id)?);
                if self.world.tank(id).is_some() {
                    self.distances.insert(own, id, distance);
                }
                Ok(distance)
            }
            Target::Angle(_) => Err(TargetError::Unsupported {
                operation: "distance_to",
                given: "angle",
                accepted: "point or entity",
            }),
        }
    }

    /// True when per-tank debug output is on for this tank.
    #[must_use]
    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Emits a debug line tagged with the tank id when debugging this tank.
    pub fn debug(&self, message: impl fmt::Display) {
        if self.debug {
            debug!(tank = %self.tank.id(), "{message}");
        }
    }
}

fn finite(point: Point) -> Result<Point, GeometryError> {
    Point::try_new(point.x(), point.y())
}

// =============================================================================
// Built-in behaviors
// =============================================================================

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Behavior for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }
}

/// Never moves; optionally fires whenever the gun is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTarget {
    /// Fire on every reload
    pub auto_fire: bool,
}

impl StaticTarget {
    /// A static target.
    #[must_use]
    pub const fn new(auto_fire: bool) -> Self {
        Self { auto_fire }
    }
}

impl Behavior for StaticTarget {
    fn name(&self) -> &'static str {
        "static_target"
    }

    fn on_gun_reloaded(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        if self.auto_fire {
            ctl.fire();
        }
        Ok(())
    }
}

/// Wanders between random points, picking a new one whenever it stops or
/// bumps into something; optionally fires whenever the gun is loaded.
#[derive(Debug, Clone, Copy)]
pub struct Roamer {
    /// Fire on every reload
    pub auto_fire: bool,
    /// Travel speed per tick
    pub speed: f64,
}

impl Roamer {
    /// Default travel speed.
    pub const DEFAULT_SPEED: f64 = 3.0;

    /// A roamer travelling at the default speed.
    #[must_use]
    pub const fn new(auto_fire: bool) -> Self {
        Self {
            auto_fire,
            speed: Self::DEFAULT_SPEED,
        }
    }

    fn wander(&self, ctl: &mut TankControl<'_>) -> HookResult {
        let point = ctl.random_point();
        ctl.debug(format_args!("wander to {point}"));
        ctl.move_at(point, self.speed)?;
        Ok(())
    }
}

impl Default for Roamer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Behavior for Roamer {
    fn name(&self) -> &'static str {
        "roamer"
    }

    fn on_born(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        self.wander(ctl)
    }

    fn on_stopped(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        self.wander(ctl)
    }

    fn on_collide(&mut self, ctl: &mut TankControl<'_>, other: EntityId) -> HookResult {
        ctl.debug(format_args!("collided with {other}"));
        self.wander(ctl)
    }

    fn on_gun_reloaded(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        if self.auto_fire {
            ctl.fire();
        }
        Ok(())
    }
}
