//! Entity types for the arena.
//!
//! This module provides the identity and kind types shared by everything that
//! lives on the field:
//! - [`EntityId`]: Unique, monotonically increasing identifier
//! - [`EntityTag`]: Kind classification used for capability checks
//! - [`Target`]: What a motion command aims at
//! - [`Body`]: The motion/turn state machine every entity embeds
//! - [`Tank`], [`Shot`], [`Explosion`]: The concrete entity kinds
//!
//! # Ownership
//!
//! Entities never hold references to each other. Cross-links (a shot's owner,
//! a tank's attached explosion) are stored as `Option<EntityId>` and resolved
//! through the [`Scene`](crate::scene::Scene) when needed, so removing an
//! entity can never leave a dangling pointer behind.
//!
//! # Example
//!
//! ```
//! use robotank_core::entity::{EntityId, EntityTag};
//!
//! let id = EntityId::new(42);
//! assert_eq!(id.as_u64(), 42);
//! assert!(EntityTag::Shot.logs_when_unselected());
//! assert!(!EntityTag::Tank.logs_when_unselected());
//! ```

pub mod body;
pub mod explosion;
pub mod shot;
pub mod tank;

use std::fmt;

use planar::Point;
use serde::{Deserialize, Serialize};

pub use body::{Body, MotionState};
pub use explosion::{Explosion, ExplosionSize};
pub use shot::Shot;
pub use tank::{Tank, TankKind, TankSpec};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Identifiers are handed out in
/// increasing order by the scene and never reused, so ordering by id is the
/// same as ordering by creation time.
///
/// # Example
///
/// ```
/// use robotank_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id2.to_string(), "2");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Hands out entity ids for one scene.
///
/// The first id is 1.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub(crate) fn next_id(&mut self) -> EntityId {
        self.last += 1;
        EntityId::new(self.last)
    }
}

/// Entity kind.
///
/// The tag is what capability checks look at (debug gating, which snapshot
/// fields are present) instead of inspecting concrete types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Armored, armed, behavior-driven
    Tank,
    /// Projectile fired by a tank's gun
    Shot,
    /// Short-lived visual marker of a detonation
    Explosion,
}

impl EntityTag {
    /// Whether per-entity debug output is emitted without the entity being
    /// selected. Only tanks require selection.
    #[must_use]
    pub const fn logs_when_unselected(self) -> bool {
        !matches!(self, Self::Tank)
    }

    /// Whether entities of this kind carry armor and a gun.
    #[must_use]
    pub const fn is_armed(self) -> bool {
        matches!(self, Self::Tank)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tank => write!(f, "Tank"),
            Self::Shot => write!(f, "Shot"),
            Self::Explosion => write!(f, "Explosion"),
        }
    }
}

/// What a turn or move command aims at.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// A fixed field position
    Point(Point),
    /// The current position of a live entity
    Entity(EntityId),
    /// An absolute direction in degrees
    Angle(f64),
}

impl Target {
    /// Short name of the target kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Entity(_) => "entity",
            Self::Angle(_) => "angle",
        }
    }
}

impl From<Point> for Target {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<EntityId> for Target {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

impl From<f64> for Target {
    fn from(angle: f64) -> Self {
        Self::Angle(angle)
    }
}

impl From<(f64, f64)> for Target {
    fn from(coords: (f64, f64)) -> Self {
        Self::Point(Point::from(coords))
    }
}
