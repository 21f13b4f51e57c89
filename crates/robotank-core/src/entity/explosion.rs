//! Explosions.
//!
//! An explosion is a short-lived marker with no collision radius. When it is
//! attached to a tank it keeps its position relative to that tank: the offset
//! is stored in the tank's local frame and re-applied every tick with the
//! tank's current course.

use planar::{Point, Vector};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::entity::{Body, EntityId, EntityTag};

/// Which detonation produced the explosion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    /// A destroyed tank
    Large,
    /// A shot hitting something
    Small,
}

/// Where an explosion is anchored.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Anchor {
    pub(crate) id: EntityId,
    pub(crate) coord: Point,
    pub(crate) course: f64,
}

/// A detonation marker.
#[derive(Debug, Clone)]
pub struct Explosion {
    body: Body,
    size: ExplosionSize,
    pub(crate) owner: Option<EntityId>,
    offset: Vector,
    life: u32,
}

impl Explosion {
    pub(crate) fn new(
        id: EntityId,
        coord: Point,
        size: ExplosionSize,
        anchor: Option<Anchor>,
        config: &SimConfig,
    ) -> Self {
        let offset = anchor.map_or(Vector::ZERO, |a| {
            Vector::from_points(a.coord, coord, None).rotated(-a.course)
        });
        Self {
            body: Body::new(
                id,
                EntityTag::Explosion,
                coord,
                0.0,
                0.0,
                false,
                0.0,
                config.heartbeat_interval,
            ),
            size,
            owner: anchor.map(|a| a.id),
            offset,
            life: config.explosion_life,
        }
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.body.id()
    }

    /// Motion state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Large or small.
    #[must_use]
    pub const fn size(&self) -> ExplosionSize {
        self.size
    }

    /// Tank the explosion is attached to.
    #[must_use]
    pub const fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Offset from the owner in the owner's local frame.
    #[must_use]
    pub const fn offset(&self) -> Vector {
        self.offset
    }

    /// Ticks left.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
    }

    /// Re-anchors the explosion to its owner's current position and course.
    pub(crate) fn follow(&mut self, owner_coord: Point, owner_course: f64) {
        let shift = Vector::from_direction(owner_course + self.offset.angle(), self.offset.magnitude());
        self.body.set_coord(owner_coord + shift);
    }

    /// Counts one tick off the lifetime. Returns true when it has run out.
    pub(crate) fn age(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn offset_is_in_owner_frame() {
        let config = SimConfig::default();
        let anchor = Anchor {
            id: EntityId::new(1),
            coord: Point::new(100.0, 100.0),
            course: 90.0,
        };
        // Directly ahead of a tank facing up.
        let explosion = Explosion::new(
            EntityId::new(5),
            Point::new(100.0, 110.0),
            ExplosionSize::Small,
            Some(anchor),
            &config,
        );
        assert!(explosion.offset().angle().abs() < EPS);
        assert!((explosion.offset().magnitude() - 10.0).abs() < EPS);
        assert_eq!(explosion.owner(), Some(EntityId::new(1)));
    }

    #[test]
    fn follows_owner_rotation() {
        let config = SimConfig::default();
        let anchor = Anchor {
            id: EntityId::new(1),
            coord: Point::new(100.0, 100.0),
            course: 0.0,
        };
        let mut explosion = Explosion::new(
            EntityId::new(5),
            Point::new(110.0, 100.0),
            ExplosionSize::Small,
            Some(anchor),
            &config,
        );
        // Owner moved and now faces 180: the explosion stays in front of it.
        explosion.follow(Point::new(200.0, 50.0), 180.0);
        assert!((explosion.body().coord().x() - 190.0).abs() < EPS);
        assert!((explosion.body().coord().y() - 50.0).abs() < EPS);
    }

    #[test]
    fn unanchored_has_no_offset() {
        let config = SimConfig::default();
        let mut explosion = Explosion::new(
            EntityId::new(5),
            Point::new(10.0, 10.0),
            ExplosionSize::Large,
            None,
            &config,
        );
        assert_eq!(explosion.owner(), None);
        assert!(explosion.offset().magnitude().abs() < EPS);
        assert!((explosion.body().radius()).abs() < EPS);

        let lived = std::iter::repeat_with(|| explosion.age())
            .take_while(|expired| !expired)
            .count();
        assert_eq!(lived + 1, 12);
    }
}
