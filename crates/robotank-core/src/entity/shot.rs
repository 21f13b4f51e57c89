//! Projectiles.

use crate::config::SimConfig;
use crate::entity::{Body, EntityId, EntityTag};
use crate::gun::Muzzle;

/// A projectile flying in a straight line until it hits, expires or reaches
/// the field edge.
#[derive(Debug, Clone)]
pub struct Shot {
    body: Body,
    pub(crate) owner: Option<EntityId>,
    power: u32,
    life: u32,
}

impl Shot {
    /// Starts a shot at the muzzle, already moving along its course.
    pub(crate) fn launch(id: EntityId, muzzle: Muzzle, owner: Option<EntityId>, config: &SimConfig) -> Self {
        let mut body = Body::new(
            id,
            EntityTag::Shot,
            muzzle.point,
            muzzle.course,
            config.shot.radius,
            false,
            config.shot.speed,
            config.heartbeat_interval,
        );
        body.move_in(muzzle.course, config.shot.speed, config.far_target_factor);
        Self {
            body,
            owner,
            power: config.shot.power,
            life: config.shot.life,
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

    /// Tank that fired this shot, while it is known.
    #[must_use]
    pub const fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Armor removed on hit.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Ticks left before the shot fizzles.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
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
    use crate::entity::MotionState;
    use planar::Point;

    #[test]
    fn launch_is_moving_at_shot_speed() {
        let config = SimConfig::default();
        let muzzle = Muzzle {
            point: Point::new(100.0, 100.0),
            course: 0.0,
        };
        let shot = Shot::launch(EntityId::new(3), muzzle, Some(EntityId::new(1)), &config);
        assert_eq!(shot.body().state(), MotionState::Moving);
        assert!((shot.body().heading().magnitude() - 10.0).abs() < 1e-9);
        assert!(!shot.body().is_revolvable());
        assert_eq!(shot.owner(), Some(EntityId::new(1)));
        assert_eq!(shot.power(), 10);
        assert_eq!(shot.life(), 60);
    }

    #[test]
    fn ages_out_after_life_ticks() {
        let config = SimConfig::default();
        let muzzle = Muzzle {
            point: Point::new(100.0, 100.0),
            course: 0.0,
        };
        let mut shot = Shot::launch(EntityId::new(3), muzzle, None, &config);
        let ticks = std::iter::repeat_with(|| shot.age())
            .take_while(|expired| !expired)
            .count();
        assert_eq!(ticks + 1, 60);
    }
}
