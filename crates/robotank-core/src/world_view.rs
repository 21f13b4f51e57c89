//! Read-only access to the arena for behaviors.
//!
//! While a tank's events are being handled, its behavior gets a
//! [`TankControl`](crate::behavior::TankControl) that mutates only that tank.
//! Everything else is reachable through the [`WorldView`] it carries, which
//! borrows the scene's entity maps immutably.
//!
//! The tank being handled is temporarily out of the tank map, so
//! `WorldView::tank(own_id)` returns `None`; use `TankControl::tank` for it.

use std::collections::BTreeMap;

use planar::Point;

use crate::entity::{EntityId, Explosion, Shot, Tank};

/// Immutable view of every live entity except the one being controlled.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    tanks: &'a BTreeMap<EntityId, Tank>,
    shots: &'a BTreeMap<EntityId, Shot>,
    explosions: &'a BTreeMap<EntityId, Explosion>,
    tick: u64,
}

impl<'a> WorldView<'a> {
    pub(crate) fn new(
        tanks: &'a BTreeMap<EntityId, Tank>,
        shots: &'a BTreeMap<EntityId, Shot>,
        explosions: &'a BTreeMap<EntityId, Explosion>,
        tick: u64,
    ) -> Self {
        Self {
            tanks,
            shots,
            explosions,
            tick,
        }
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// A live tank.
    #[must_use]
    pub fn tank(&self, id: EntityId) -> Option<&'a Tank> {
        self.tanks.get(&id)
    }

    /// A live shot.
    #[must_use]
    pub fn shot(&self, id: EntityId) -> Option<&'a Shot> {
        self.shots.get(&id)
    }

    /// A live explosion.
    #[must_use]
    pub fn explosion(&self, id: EntityId) -> Option<&'a Explosion> {
        self.explosions.get(&id)
    }

    /// Live tanks in id order.
    pub fn tanks(&self) -> impl Iterator<Item = &'a Tank> {
        self.tanks.values()
    }

    /// Position of any live entity.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Point> {
        self.tanks
            .get(&id)
            .map(Tank::coord)
            .or_else(|| self.shots.get(&id).map(|s| s.body().coord()))
            .or_else(|| self.explosions.get(&id).map(|e| e.body().coord()))
    }

    /// True when `id` is a live entity in view.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.tanks.contains_key(&id) || self.shots.contains_key(&id) || self.explosions.contains_key(&id)
    }
}

/// Tank-to-tank distances measured this tick.
///
/// Keys are unordered pairs, stored smaller id first. Cleared at the start of
/// every tick.
#[derive(Debug, Clone, Default)]
pub(crate) struct DistanceCache {
    pairs: BTreeMap<(EntityId, EntityId), f64>,
}

impl DistanceCache {
    fn key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pairs.clear();
    }

    pub(crate) fn insert(&mut self, a: EntityId, b: EntityId, distance: f64) {
        self.pairs.insert(Self::key(a, b), distance);
    }

    pub(crate) fn get(&self, a: EntityId, b: EntityId) -> Option<f64> {
        self.pairs.get(&Self::key(a, b)).copied()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::entity::TankKind;

    #[test]
    fn distance_cache_is_order_independent() {
        let mut cache = DistanceCache::default();
        cache.insert(EntityId::new(5), EntityId::new(2), 12.5);
        assert_eq!(cache.get(EntityId::new(2), EntityId::new(5)), Some(12.5));
        assert_eq!(cache.get(EntityId::new(5), EntityId::new(2)), Some(12.5));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.get(EntityId::new(2), EntityId::new(5)), None);
    }

    #[test]
    fn view_finds_entities() {
        let config = SimConfig::default();
        let mut tanks = BTreeMap::new();
        let id = EntityId::new(1);
        tanks.insert(id, Tank::new(id, Point::new(50.0, 60.0), 0.0, TankKind::Player, &config));
        let shots = BTreeMap::new();
        let explosions = BTreeMap::new();

        let view = WorldView::new(&tanks, &shots, &explosions, 3);
        assert_eq!(view.tick(), 3);
        assert!(view.is_alive(id));
        assert!(!view.is_alive(EntityId::new(2)));
        assert_eq!(view.position_of(id), Some(Point::new(50.0, 60.0)));
        assert_eq!(view.tanks().count(), 1);
    }
}
