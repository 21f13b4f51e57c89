//! Tanks.

use planar::{GeometryError, Point, Vector};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::entity::{Body, EntityId, EntityTag};
use crate::gun::Gun;

/// How a tank looks and whether the user may select it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    /// Blue, selectable
    #[default]
    Player,
    /// Red, not selectable
    Target,
}

impl TankKind {
    /// Whether tanks of this kind can be selected in a renderer.
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        matches!(self, Self::Player)
    }
}

/// Spawn parameters for a tank.
///
/// Missing position and course are drawn from the scene's seeded RNG.
///
/// # Example
///
/// ```
/// use planar::Point;
/// use robotank_core::entity::{TankKind, TankSpec};
///
/// let spec = TankSpec::default().at(Point::new(20.0, 20.0)).facing(90.0);
/// assert_eq!(spec.kind, TankKind::Player);
/// assert_eq!(spec.course, Some(90.0));
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankSpec {
    /// Spawn position
    pub position: Option<Point>,
    /// Initial course in degrees
    pub course: Option<f64>,
    /// Look
    pub kind: TankKind,
}

impl TankSpec {
    /// Spawn at `position`.
    #[must_use]
    pub fn at(mut self, position: impl Into<Point>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Spawn facing `course` degrees.
    #[must_use]
    pub fn facing(mut self, course: f64) -> Self {
        self.course = Some(course);
        self
    }

    /// Spawn with the given look.
    #[must_use]
    pub fn kind(mut self, kind: TankKind) -> Self {
        self.kind = kind;
        self
    }

    /// Checks that any given position and course are finite.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NonFinite`] naming the bad value.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if let Some(position) = self.position {
            Point::try_new(position.x(), position.y())?;
        }
        if let Some(course) = self.course {
            Vector::try_from_direction(course, 0.0)?;
        }
        Ok(())
    }
}

/// An armored, armed, behavior-driven entity.
#[derive(Debug, Clone)]
pub struct Tank {
    body: Body,
    armor: f64,
    gun: Gun,
    kind: TankKind,
    selected: bool,
    pub(crate) explosion: Option<EntityId>,
    pub(crate) shot: Option<EntityId>,
    pub(crate) detected: Vec<EntityId>,
    pub(crate) detected_by: Vec<EntityId>,
}

impl Tank {
    pub(crate) fn new(id: EntityId, position: Point, course: f64, kind: TankKind, config: &SimConfig) -> Self {
        Self {
            body: Body::new(
                id,
                EntityTag::Tank,
                position,
                course,
                config.tank.radius,
                true,
                config.tank.speed,
                config.heartbeat_interval,
            ),
            armor: config.tank.max_armor,
            gun: Gun::new(config.tank.gun_initial_heat),
            kind,
            selected: false,
            explosion: None,
            shot: None,
            detected: Vec::new(),
            detected_by: Vec::new(),
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

    /// Current position.
    #[must_use]
    pub const fn coord(&self) -> Point {
        self.body.coord()
    }

    /// Current facing in degrees.
    #[must_use]
    pub const fn course(&self) -> f64 {
        self.body.course()
    }

    /// Armor as reported to behaviors and renderers: truncated, never
    /// negative.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn armor(&self) -> i32 {
        self.armor.max(0.0) as i32
    }

    /// Exact armor value, including regeneration fractions.
    #[must_use]
    pub const fn armor_exact(&self) -> f64 {
        self.armor
    }

    /// The tank's gun.
    #[must_use]
    pub const fn gun(&self) -> &Gun {
        &self.gun
    }

    pub(crate) fn gun_mut(&mut self) -> &mut Gun {
        &mut self.gun
    }

    /// Look.
    #[must_use]
    pub const fn kind(&self) -> TankKind {
        self.kind
    }

    /// Whether the user may select this tank.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.kind.is_selectable()
    }

    /// Whether the user has selected this tank.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected && self.is_selectable();
    }

    /// Explosion currently drawn on top of this tank.
    #[must_use]
    pub const fn explosion(&self) -> Option<EntityId> {
        self.explosion
    }

    /// Most recent shot of this tank that is still in flight.
    #[must_use]
    pub const fn shot(&self) -> Option<EntityId> {
        self.shot
    }

    /// Tanks inside this tank's radar cone this tick.
    #[must_use]
    pub fn detected(&self) -> &[EntityId] {
        &self.detected
    }

    /// Tanks whose radar cone holds this tank this tick.
    #[must_use]
    pub fn detected_by(&self) -> &[EntityId] {
        &self.detected_by
    }

    pub(crate) fn clear_radar(&mut self) {
        self.detected.clear();
        self.detected_by.clear();
    }

    pub(crate) fn regenerate(&mut self, max_armor: f64, rate: f64) {
        if self.armor < max_armor {
            self.armor = (self.armor + rate).min(max_armor);
        }
    }

    /// Applies a hit. Returns true when the armor is used up.
    pub(crate) fn take_damage(&mut self, power: u32) -> bool {
        self.armor -= f64::from(power);
        self.armor <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> Tank {
        Tank::new(
            EntityId::new(1),
            Point::new(100.0, 100.0),
            0.0,
            TankKind::Player,
            &SimConfig::default(),
        )
    }

    #[test]
    fn spawns_with_full_armor_and_cold_gun() {
        let tank = tank();
        assert_eq!(tank.armor(), 100);
        assert_eq!(tank.gun().heat(), 8);
        assert_eq!(tank.body().tag(), EntityTag::Tank);
        assert!((tank.body().radius() - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn armor_regenerates_up_to_max() {
        let mut tank = tank();
        tank.take_damage(10);
        assert_eq!(tank.armor(), 90);
        for _ in 0..5 {
            tank.regenerate(100.0, 0.1);
        }
        assert!((tank.armor_exact() - 90.5).abs() < 1e-9);
        for _ in 0..500 {
            tank.regenerate(100.0, 0.1);
        }
        assert!((tank.armor_exact() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reported_armor_is_never_negative() {
        let mut tank = tank();
        for _ in 0..9 {
            assert!(!tank.take_damage(10));
        }
        assert!(tank.take_damage(15));
        assert_eq!(tank.armor(), 0);
        assert!(tank.armor_exact() < 0.0);
    }

    #[test]
    fn targets_cannot_be_selected() {
        let mut target = Tank::new(
            EntityId::new(2),
            Point::new(50.0, 50.0),
            0.0,
            TankKind::Target,
            &SimConfig::default(),
        );
        target.set_selected(true);
        assert!(!target.is_selected());

        let mut player = tank();
        player.set_selected(true);
        assert!(player.is_selected());
    }

    #[test]
    fn spec_builder() {
        let spec = TankSpec::default()
            .at((1.0, 2.0))
            .facing(45.0)
            .kind(TankKind::Target);
        assert_eq!(spec.position, Some(Point::new(1.0, 2.0)));
        assert_eq!(spec.course, Some(45.0));
        assert_eq!(spec.kind, TankKind::Target);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn spec_rejects_non_finite_values() {
        assert!(TankSpec::default().at((f64::NAN, 2.0)).validate().is_err());
        assert!(TankSpec::default().facing(f64::INFINITY).validate().is_err());
        assert!(TankSpec::default().validate().is_ok());
    }
}
