//! The scene: entity storage and the fixed-order tick.
//!
//! [`Scene`] owns every live entity in three id-ordered maps (tanks, shots,
//! explosions) plus one [`Behavior`] per tank. [`Scene::tick`] advances the
//! whole arena by one step in a fixed order:
//!
//! 1. **RESET**: clear the distance cache and every radar list
//! 2. **PAIRS**: each unordered tank pair once, ascending ids: push apart
//!    overlapping tanks and queue `Collide` on both, then run the radar test
//!    both ways for pairs within radar range
//! 3. **HITS**: each shot against each tank except its owner; at most one
//!    hit per shot
//! 4. **RADAR**: queue `RadarRange` on tanks that detected something
//! 5. **DRAIN**: handle queued events (tanks with their behaviors, then shots,
//!    then explosions)
//! 6. **STEP**: advance every entity's state machine
//!
//! Removals take effect immediately. Loops walk a copy of the ids taken at
//! the start of the loop and skip ids that are gone.
//!
//! # Determinism
//!
//! Storage is `BTreeMap` keyed by monotonically increasing ids and all
//! randomness comes from one `ChaCha8Rng` seeded by `SimConfig::seed`, so the
//! same seed and the same spawns replay identically.
//!
//! # Example
//!
//! ```
//! use robotank_core::behavior::Idle;
//! use robotank_core::config::SimConfig;
//! use robotank_core::entity::TankSpec;
//! use robotank_core::scene::Scene;
//!
//! let mut scene = Scene::new(SimConfig::default()).unwrap();
//! let a = scene.spawn_tank(TankSpec::default().at((100.0, 100.0)).facing(0.0), Idle).unwrap();
//! let b = scene.spawn_target(TankSpec::default().at((250.0, 100.0)), false).unwrap();
//!
//! scene.tick().unwrap();
//!
//! assert_eq!(scene.tick_number(), 1);
//! assert_eq!(scene.tank(a).unwrap().detected(), &[b]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use planar::Point;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::behavior::{Behavior, Roamer, StaticTarget, TankControl};
use crate::config::{FieldSize, SimConfig};
use crate::entity::explosion::Anchor;
use crate::entity::{
    EntityId, Explosion, ExplosionSize, IdAllocator, MotionState, Shot, Tank, TankKind, TankSpec,
};
use crate::error::{ConfigError, SceneError};
use crate::event::Event;
use crate::radar::RadarCone;
use crate::snapshot::WorldSnapshot;
use crate::world_view::{DistanceCache, WorldView};

/// A uniformly random point inside the field, `margin` away from every edge.
///
/// When the margin leaves no room on an axis the point sits on that axis'
/// centre line.
pub fn random_point<R: Rng + ?Sized>(rng: &mut R, field: FieldSize, margin: f64) -> Point {
    fn span<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
        if high > low {
            rng.gen_range(low..=high)
        } else {
            (low + high) / 2.0
        }
    }
    let x = span(rng, margin, field.width - margin);
    let y = span(rng, margin, field.height - margin);
    Point::new(x, y)
}

/// What a hit did to the tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The tank survived with this much armor.
    Damaged {
        /// Armor left, as reported
        armor: i32,
    },
    /// The tank was destroyed and replaced by an explosion.
    Destroyed {
        /// The large explosion left behind
        explosion: EntityId,
    },
}

// =============================================================================
// Scene
// =============================================================================

/// Container for every live entity and the tick that advances them.
pub struct Scene {
    config: SimConfig,
    radar: RadarCone,
    tanks: BTreeMap<EntityId, Tank>,
    behaviors: BTreeMap<EntityId, Box<dyn Behavior>>,
    shots: BTreeMap<EntityId, Shot>,
    explosions: BTreeMap<EntityId, Explosion>,
    ids: IdAllocator,
    rng: ChaCha8Rng,
    distances: DistanceCache,
    tick: u64,
    debug: bool,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("tick", &self.tick)
            .field("tanks", &self.tanks.len())
            .field("shots", &self.shots.len())
            .field("explosions", &self.explosions.len())
            .field("debug", &self.debug)
            .field("seed", &self.config.seed)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Creates an empty scene.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the configuration fails
    /// validation.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            radar: RadarCone::for_tanks(&config.tank),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            tanks: BTreeMap::new(),
            behaviors: BTreeMap::new(),
            shots: BTreeMap::new(),
            explosions: BTreeMap::new(),
            ids: IdAllocator::default(),
            distances: DistanceCache::default(),
            tick: 0,
            debug: false,
        })
    }

    // -------------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------------

    /// Spawns a tank driven by `behavior` and queues its `Born` event.
    ///
    /// A missing position is drawn at random, inset by the larger of the
    /// spawn margin and the tank radius; a missing course is drawn from
    /// `[0, 360)`.
    ///
    /// # Errors
    ///
    /// [`SceneError::Spawn`] when the spec's position or course is NaN or
    /// infinite.
    pub fn spawn_tank<B: Behavior + 'static>(&mut self, spec: TankSpec, behavior: B) -> Result<EntityId, SceneError> {
        spec.validate()?;
        let margin = self.config.spawn_margin.max(self.config.tank.radius);
        let position = match spec.position {
            Some(position) => position,
            None => random_point(&mut self.rng, self.config.field, margin),
        };
        let course = match spec.course {
            Some(course) => course,
            None => self.rng.gen_range(0.0..360.0),
        };

        let id = self.ids.next_id();
        let mut tank = Tank::new(id, position, course, spec.kind, &self.config);
        tank.body_mut().push_event(Event::Born);
        info!(
            tank = %id,
            behavior = behavior.name(),
            kind = ?spec.kind,
            %position,
            course = tank.course(),
            "tank spawned"
        );
        self.tanks.insert(id, tank);
        self.behaviors.insert(id, Box::new(behavior));
        Ok(id)
    }

    /// Spawns a red tank that roams between random points.
    ///
    /// # Errors
    ///
    /// As [`Scene::spawn_tank`].
    pub fn spawn_target(&mut self, spec: TankSpec, auto_fire: bool) -> Result<EntityId, SceneError> {
        self.spawn_tank(spec.kind(TankKind::Target), Roamer::new(auto_fire))
    }

    /// Spawns a red tank that never moves.
    ///
    /// # Errors
    ///
    /// As [`Scene::spawn_tank`].
    pub fn spawn_static_target(&mut self, spec: TankSpec, auto_fire: bool) -> Result<EntityId, SceneError> {
        self.spawn_tank(spec.kind(TankKind::Target), StaticTarget::new(auto_fire))
    }

    /// Puts a shot on the field without a gun. Shots are normally created
    /// only by firing; this is for scenario tests.
    #[cfg(test)]
    pub(crate) fn launch_shot(&mut self, position: Point, course: f64, owner: Option<EntityId>) -> EntityId {
        use crate::gun::Muzzle;

        let id = self.ids.next_id();
        let muzzle = Muzzle {
            point: position,
            course,
        };
        self.shots
            .insert(id, Shot::launch(id, muzzle, owner, &self.config));
        if let Some(tank) = owner.and_then(|owner| self.tanks.get_mut(&owner)) {
            tank.shot = Some(id);
        }
        id
    }

    fn spawn_explosion(&mut self, coord: Point, size: ExplosionSize, anchor: Option<Anchor>) -> EntityId {
        let id = self.ids.next_id();
        self.explosions
            .insert(id, Explosion::new(id, coord, size, anchor, &self.config));
        if let Some(owner) = anchor.and_then(|a| self.tanks.get_mut(&a.id)) {
            owner.explosion = Some(id);
        }
        if self.debug {
            debug!(explosion = %id, ?size, %coord, "explosion");
        }
        id
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The configuration the scene runs with.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick_number(&self) -> u64 {
        self.tick
    }

    /// Whether debug output is on.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Turns debug output on or off.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// A live tank.
    #[must_use]
    pub fn tank(&self, id: EntityId) -> Option<&Tank> {
        self.tanks.get(&id)
    }

    /// A live shot.
    #[must_use]
    pub fn shot(&self, id: EntityId) -> Option<&Shot> {
        self.shots.get(&id)
    }

    /// A live explosion.
    #[must_use]
    pub fn explosion(&self, id: EntityId) -> Option<&Explosion> {
        self.explosions.get(&id)
    }

    /// Live tanks in id order.
    pub fn tanks(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.values()
    }

    /// Live shots in id order.
    pub fn shots(&self) -> impl Iterator<Item = &Shot> {
        self.shots.values()
    }

    /// Live explosions in id order.
    pub fn explosions(&self) -> impl Iterator<Item = &Explosion> {
        self.explosions.values()
    }

    /// Number of live tanks.
    #[must_use]
    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    /// Number of live shots.
    #[must_use]
    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    /// Number of live explosions.
    #[must_use]
    pub fn explosion_count(&self) -> usize {
        self.explosions.len()
    }

    /// True when `id` is any live entity.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.world().is_alive(id)
    }

    /// Read-only view of every live entity.
    #[must_use]
    pub fn world(&self) -> WorldView<'_> {
        WorldView::new(&self.tanks, &self.shots, &self.explosions, self.tick)
    }

    /// Value copy of the whole scene for renderers.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    /// Marks exactly the listed tanks as selected. Tanks that are not
    /// selectable stay unselected.
    pub fn apply_selection(&mut self, selected: &[EntityId]) {
        for (id, tank) in &mut self.tanks {
            tank.set_selected(selected.contains(id));
        }
    }

    fn tank_debug(&self, tank: &Tank) -> bool {
        self.debug && (tank.body().tag().logs_when_unselected() || tank.is_selected())
    }

    /// Runs `f` with control of tank `id`, outside of event handling.
    ///
    /// Shots fired inside `f` join the scene when it returns.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownEntity`] when the tank is not live.
    pub fn command<R>(&mut self, id: EntityId, f: impl FnOnce(&mut TankControl<'_>) -> R) -> Result<R, SceneError> {
        let mut tank = self.tanks.remove(&id).ok_or(SceneError::UnknownEntity(id))?;
        let debug = self.tank_debug(&tank);
        let mut launched = Vec::new();
        let result = {
            let world = WorldView::new(&self.tanks, &self.shots, &self.explosions, self.tick);
            let mut ctl = TankControl::new(
                &mut tank,
                world,
                &mut launched,
                &mut self.ids,
                &mut self.rng,
                &mut self.distances,
                &self.config,
                debug,
            );
            f(&mut ctl)
        };
        self.tanks.insert(id, tank);
        self.adopt_shots(launched);
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the scene by one tick.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a behavior hook, or
    /// [`SceneError::EventStorm`] when a tank's queue never empties. A failed
    /// tick leaves the scene partially advanced and should not be retried.
    pub fn tick(&mut self) -> Result<(), SceneError> {
        self.distances.clear();
        for tank in self.tanks.values_mut() {
            tank.clear_radar();
        }

        self.resolve_pairs();
        self.resolve_hits()?;
        self.queue_radar_events();
        self.drain_events()?;
        self.step_entities();

        self.tick += 1;
        if self.debug {
            debug!(
                tick = self.tick,
                tanks = self.tanks.len(),
                shots = self.shots.len(),
                explosions = self.explosions.len(),
                "tick complete"
            );
        }
        Ok(())
    }

    fn resolve_pairs(&mut self) {
        let ids: Vec<EntityId> = self.tanks.keys().copied().collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                self.resolve_pair(a, b);
            }
        }
    }

    fn resolve_pair(&mut self, a: EntityId, b: EntityId) {
        let (Some(tank_a), Some(tank_b)) = (self.tanks.get(&a), self.tanks.get(&b)) else {
            return;
        };
        let (pos_a, pos_b) = (tank_a.coord(), tank_b.coord());
        let mut distance = pos_a.distance_to(pos_b);
        let overlap = tank_a.body().radius() + tank_b.body().radius() - distance;

        if overlap > self.config.collision_tolerance {
            let push = separation(pos_a, pos_b, overlap / 2.0);
            if let Some(tank) = self.tanks.get_mut(&a) {
                tank.body_mut().translate(push);
                tank.body_mut().push_event(Event::Collide(b));
            }
            if let Some(tank) = self.tanks.get_mut(&b) {
                tank.body_mut().translate(-push);
                tank.body_mut().push_event(Event::Collide(a));
            }
            distance = (pos_a.as_dvec2() + push).distance(pos_b.as_dvec2() - push);
            if self.debug {
                debug!(%a, %b, overlap, distance, "collision");
            }
        }

        self.distances.insert(a, b, distance);
        if distance < self.config.tank.radar_range {
            self.radar_check(a, b);
            self.radar_check(b, a);
        }
    }

    fn radar_check(&mut self, observer: EntityId, target: EntityId) {
        let (Some(seer), Some(seen)) = (self.tanks.get(&observer), self.tanks.get(&target)) else {
            return;
        };
        if seen.armor() <= 0 || !self.radar.sees(seer.coord(), seer.course(), seen.coord()) {
            return;
        }
        if self.tank_debug(seer) {
            debug!(tank = %observer, sees = %target, "radar contact");
        }
        if let Some(seer) = self.tanks.get_mut(&observer) {
            seer.detected.push(target);
        }
        if let Some(seen) = self.tanks.get_mut(&target) {
            seen.detected_by.push(observer);
        }
    }

    fn resolve_hits(&mut self) -> Result<(), SceneError> {
        let shot_ids: Vec<EntityId> = self.shots.keys().copied().collect();
        for shot_id in shot_ids {
            let Some(shot) = self.shots.get(&shot_id) else {
                continue;
            };
            let (coord, radius, owner) = (shot.body().coord(), shot.body().radius(), shot.owner());
            let victim = self
                .tanks
                .values()
                .find(|tank| {
                    Some(tank.id()) != owner
                        && coord.distance_to(tank.coord()) <= radius + tank.body().radius()
                })
                .map(Tank::id);
            if let Some(tank_id) = victim {
                self.hit(tank_id, shot_id)?;
                self.detonate_shot_at(shot_id, tank_id)?;
            }
        }
        Ok(())
    }

    /// Applies `shot`'s power to `tank` and queues `Hit`.
    ///
    /// When the armor runs out the shooter (if still alive) is sent
    /// `TargetDestroyed` and the tank is detonated. The shot itself is left
    /// in place; see [`Scene::detonate_shot_at`].
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownEntity`] when either entity is not live.
    pub fn hit(&mut self, tank_id: EntityId, shot_id: EntityId) -> Result<HitOutcome, SceneError> {
        let shot = self
            .shots
            .get(&shot_id)
            .ok_or(SceneError::UnknownEntity(shot_id))?;
        let (power, shooter) = (shot.power(), shot.owner());
        let tank = self
            .tanks
            .get_mut(&tank_id)
            .ok_or(SceneError::UnknownEntity(tank_id))?;

        let destroyed = tank.take_damage(power);
        tank.body_mut().push_event(Event::Hit);
        if !destroyed {
            let armor = tank.armor();
            if self.debug {
                debug!(tank = %tank_id, shot = %shot_id, armor, "hit");
            }
            return Ok(HitOutcome::Damaged { armor });
        }

        if let Some(shooter) = shooter.and_then(|id| self.tanks.get_mut(&id)) {
            shooter.body_mut().push_event(Event::TargetDestroyed);
        }
        let explosion = self.detonate(tank_id)?;
        info!(tank = %tank_id, shot = %shot_id, shooter = ?shooter, tick = self.tick, "tank destroyed");
        Ok(HitOutcome::Destroyed { explosion })
    }

    /// Destroys a tank: it stops, a large explosion appears where it stood
    /// and the tank and its behavior are removed.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownEntity`] when the tank is not live.
    pub fn detonate(&mut self, tank_id: EntityId) -> Result<EntityId, SceneError> {
        let mut tank = self
            .tanks
            .remove(&tank_id)
            .ok_or(SceneError::UnknownEntity(tank_id))?;
        self.behaviors.remove(&tank_id);
        tank.body_mut().stop();
        let anchor = Anchor {
            id: tank_id,
            coord: tank.coord(),
            course: tank.course(),
        };
        Ok(self.spawn_explosion(tank.coord(), ExplosionSize::Large, Some(anchor)))
    }

    /// Removes a shot that struck `tank_id`, leaving a small explosion at the
    /// impact point attached to the tank if it survived.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownEntity`] when the shot is not live.
    pub fn detonate_shot_at(&mut self, shot_id: EntityId, tank_id: EntityId) -> Result<EntityId, SceneError> {
        let shot = self
            .shots
            .remove(&shot_id)
            .ok_or(SceneError::UnknownEntity(shot_id))?;
        self.release_shot(&shot);
        let anchor = self.tanks.get(&tank_id).map(|tank| Anchor {
            id: tank_id,
            coord: tank.coord(),
            course: tank.course(),
        });
        Ok(self.spawn_explosion(shot.body().coord(), ExplosionSize::Small, anchor))
    }

    /// Clears the owner's last-shot link if it still names this shot.
    fn release_shot(&mut self, shot: &Shot) {
        if let Some(owner) = shot.owner().and_then(|id| self.tanks.get_mut(&id)) {
            if owner.shot == Some(shot.id()) {
                owner.shot = None;
            }
        }
    }

    fn queue_radar_events(&mut self) {
        for tank in self.tanks.values_mut() {
            if !tank.detected.is_empty() {
                let detected = tank.detected.clone();
                tank.body_mut().push_event(Event::RadarRange(detected));
            }
        }
    }

    fn drain_events(&mut self) -> Result<(), SceneError> {
        let ids: Vec<EntityId> = self.tanks.keys().copied().collect();
        for id in ids {
            self.drain_tank(id)?;
        }

        let debug = self.debug;
        for shot in self.shots.values_mut() {
            let dropped = shot.body_mut().discard_events();
            if debug && dropped > 0 {
                trace!(shot = %shot.id(), dropped, "events dropped");
            }
        }
        for explosion in self.explosions.values_mut() {
            let dropped = explosion.body_mut().discard_events();
            if debug && dropped > 0 {
                trace!(explosion = %explosion.id(), dropped, "events dropped");
            }
        }
        Ok(())
    }

    fn drain_tank(&mut self, id: EntityId) -> Result<(), SceneError> {
        let Some(mut tank) = self.tanks.remove(&id) else {
            return Ok(());
        };
        let mut behavior = self.behaviors.remove(&id);
        let debug = self.tank_debug(&tank);
        let limit = self.config.max_events_per_drain;
        let mut launched = Vec::new();
        let mut handled = 0usize;

        let result = loop {
            let Some(event) = tank.body_mut().pop_event() else {
                break Ok(());
            };
            handled += 1;
            if handled > limit {
                break Err(SceneError::EventStorm { id, limit });
            }
            if debug {
                debug!(tank = %id, event = event.name(), "handle");
            }
            let Some(hooks) = behavior.as_mut() else {
                continue;
            };
            let world = WorldView::new(&self.tanks, &self.shots, &self.explosions, self.tick);
            let mut ctl = TankControl::new(
                &mut tank,
                world,
                &mut launched,
                &mut self.ids,
                &mut self.rng,
                &mut self.distances,
                &self.config,
                debug,
            );
            if let Err(err) = event.handle(hooks.as_mut(), &mut ctl) {
                break Err(err);
            }
        };

        self.tanks.insert(id, tank);
        if let Some(behavior) = behavior {
            self.behaviors.insert(id, behavior);
        }
        self.adopt_shots(launched);
        result
    }

    fn adopt_shots(&mut self, launched: Vec<Shot>) {
        for shot in launched {
            self.shots.insert(shot.id(), shot);
        }
    }

    fn step_entities(&mut self) {
        let (max_armor, renewal) = (self.config.tank.max_armor, self.config.tank.armor_renewal_rate);
        for tank in self.tanks.values_mut() {
            tank.regenerate(max_armor, renewal);
            if tank.gun_mut().step() {
                tank.body_mut().push_event(Event::GunReloaded);
            }
            if let Some(explosion) = tank.explosion.and_then(|id| self.explosions.get_mut(&id)) {
                explosion.follow(tank.coord(), tank.course());
            }
            tank.body_mut().step(&self.config);
        }

        let mut spent_shots = Vec::new();
        for (id, shot) in &mut self.shots {
            if shot.age() || shot.body().state() != MotionState::Moving {
                spent_shots.push(*id);
            } else {
                shot.body_mut().step(&self.config);
            }
        }
        for id in spent_shots {
            if let Some(shot) = self.shots.remove(&id) {
                self.release_shot(&shot);
                if self.debug {
                    trace!(shot = %id, "shot spent");
                }
            }
        }

        let mut spent_explosions = Vec::new();
        for (id, explosion) in &mut self.explosions {
            if explosion.age() {
                spent_explosions.push(*id);
            } else {
                explosion.body_mut().step(&self.config);
            }
        }
        for id in spent_explosions {
            let Some(explosion) = self.explosions.remove(&id) else {
                continue;
            };
            if let Some(owner) = explosion.owner().and_then(|owner| self.tanks.get_mut(&owner)) {
                if owner.explosion == Some(id) {
                    owner.explosion = None;
                }
            }
        }
    }
}

/// Push for the first tank of an overlapping pair; the second gets the
/// opposite. Coincident centres separate along the x axis.
fn separation(a: Point, b: Point, half_overlap: f64) -> DVec2 {
    let direction = (a.as_dvec2() - b.as_dvec2())
        .try_normalize()
        .unwrap_or(DVec2::X);
    direction * half_overlap
}
