//! Value-copied world state for renderers.
//!
//! A [`WorldSnapshot`] is everything a renderer needs to draw one frame, with
//! no references back into the scene. It crosses the transport boundary
//! by value and round-trips through JSON unchanged.
//!
//! ```
//! use robotank_core::behavior::Idle;
//! use robotank_core::config::SimConfig;
//! use robotank_core::entity::TankSpec;
//! use robotank_core::scene::Scene;
//! use robotank_core::snapshot::{ObjectFlags, Sprite};
//!
//! let mut scene = Scene::new(SimConfig::default()).unwrap();
//! let id = scene.spawn_tank(TankSpec::default().at((50.0, 60.0)), Idle).unwrap();
//!
//! let snapshot = scene.snapshot();
//! let tank = snapshot.get(id).unwrap();
//! assert_eq!(tank.sprite, Sprite::TankBlue);
//! assert!(tank.flags.contains(ObjectFlags::SELECTABLE));
//! assert_eq!(tank.armor, Some(100));
//! ```

use bitflags::bitflags;
use planar::Point;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, EntityId, EntityTag, Explosion, ExplosionSize, Shot, Tank, TankKind};
use crate::scene::Scene;

/// Highest drawing layer; anything above is clamped to it.
pub const MAX_LAYER: u8 = 5;

bitflags! {
    /// Per-object display flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ObjectFlags: u8 {
        /// Rotates toward its course gradually
        const REVOLVABLE = 1 << 0;
        /// Can be picked in the UI
        const SELECTABLE = 1 << 1;
        /// Cycles animation frames when not revolvable
        const ANIMATED = 1 << 2;
        /// Currently picked in the UI
        const SELECTED = 1 << 3;
    }
}

/// Which image a renderer draws for an object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// Player tank
    TankBlue,
    /// Target tank
    TankRed,
    /// Shot in flight
    Shot,
    /// Destroyed tank
    Explosion,
    /// Shot impact
    SmallExplosion,
}

impl Sprite {
    /// Image file the renderer loads for this sprite.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::TankBlue => "tank_blue.png",
            Self::TankRed => "tank_red.png",
            Self::Shot => "shot.png",
            Self::Explosion => "explosion.png",
            Self::SmallExplosion => "small_explosion.png",
        }
    }

    /// Drawing layer; higher layers are drawn on top.
    #[must_use]
    pub const fn layer(self) -> u8 {
        match self {
            Self::TankBlue | Self::TankRed => clamp_layer(2),
            Self::Shot => clamp_layer(3),
            Self::Explosion | Self::SmallExplosion => MAX_LAYER,
        }
    }
}

/// Limits a layer number to [`MAX_LAYER`].
#[must_use]
pub const fn clamp_layer(layer: u8) -> u8 {
    if layer > MAX_LAYER {
        MAX_LAYER
    } else {
        layer
    }
}

/// One entity as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Entity id
    pub id: EntityId,
    /// Entity kind
    pub tag: EntityTag,
    /// Field position
    pub coord: Point,
    /// Direction of travel the body is turning toward, in degrees
    pub heading: f64,
    /// Direction the body currently faces, in degrees
    pub course: f64,
    /// Armor as reported (tanks only)
    pub armor: Option<i32>,
    /// Gun heat (tanks only)
    pub gun_heat: Option<u32>,
    /// Display flags
    pub flags: ObjectFlags,
    /// Image key
    pub sprite: Sprite,
    /// Drawing layer
    pub layer: u8,
    /// Tanks whose radar saw this object this tick
    pub detected_by: Vec<EntityId>,
}

impl ObjectState {
    fn from_body(body: &Body, sprite: Sprite) -> Self {
        let mut flags = ObjectFlags::ANIMATED;
        flags.set(ObjectFlags::REVOLVABLE, body.is_revolvable());
        Self {
            id: body.id(),
            tag: body.tag(),
            coord: body.coord(),
            heading: body.heading().angle(),
            course: body.course(),
            armor: None,
            gun_heat: None,
            flags,
            sprite,
            layer: sprite.layer(),
            detected_by: Vec::new(),
        }
    }

    fn from_tank(tank: &Tank) -> Self {
        let sprite = match tank.kind() {
            TankKind::Player => Sprite::TankBlue,
            TankKind::Target => Sprite::TankRed,
        };
        let mut state = Self::from_body(tank.body(), sprite);
        state.armor = Some(tank.armor());
        state.gun_heat = Some(tank.gun().heat());
        state.flags.set(ObjectFlags::SELECTABLE, tank.is_selectable());
        state.flags.set(ObjectFlags::SELECTED, tank.is_selected());
        state.detected_by = tank.detected_by().to_vec();
        state
    }

    fn from_shot(shot: &Shot) -> Self {
        Self::from_body(shot.body(), Sprite::Shot)
    }

    fn from_explosion(explosion: &Explosion) -> Self {
        let sprite = match explosion.size() {
            ExplosionSize::Large => Sprite::Explosion,
            ExplosionSize::Small => Sprite::SmallExplosion,
        };
        Self::from_body(explosion.body(), sprite)
    }

    /// Pixel position for a renderer whose y axis points down.
    #[must_use]
    pub fn screen_position(&self, field_height: f64) -> (i32, i32) {
        self.coord.to_screen(field_height)
    }
}

/// The whole arena at the end of one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks completed when the snapshot was taken
    pub tick: u64,
    /// Every live entity, sorted by id
    pub objects: Vec<ObjectState>,
}

impl WorldSnapshot {
    pub(crate) fn capture(scene: &Scene) -> Self {
        let mut objects: Vec<ObjectState> = scene
            .tanks()
            .map(ObjectState::from_tank)
            .chain(scene.shots().map(ObjectState::from_shot))
            .chain(scene.explosions().map(ObjectState::from_explosion))
            .collect();
        objects.sort_by_key(|object| object.id);
        Self {
            tick: scene.tick_number(),
            objects,
        }
    }

    /// The state of one entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&ObjectState> {
        self.objects
            .binary_search_by_key(&id, |object| object.id)
            .ok()
            .map(|index| &self.objects[index])
    }

    /// Objects of one kind, in id order.
    pub fn with_tag(&self, tag: EntityTag) -> impl Iterator<Item = &ObjectState> {
        self.objects.iter().filter(move |object| object.tag == tag)
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
