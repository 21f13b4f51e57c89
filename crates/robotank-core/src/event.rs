//! Entity events and the per-entity queue.
//!
//! Every entity owns an [`EventQueue`]. The engine pushes events during the
//! pair, hit and step phases; during the drain phase each queued event is
//! popped exactly once and dispatched to exactly one [`Behavior`] hook via
//! [`Event::handle`]. A hook may push more events (for example by calling
//! `stop()`); those are handled in the same drain.

use std::collections::VecDeque;

use planar::Point;
use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, HookResult, TankControl};
use crate::entity::EntityId;

/// Something that happened to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// The entity was just created
    Born,
    /// The entity came to rest
    Stopped,
    /// The entity reached the point given to `move_at`
    StoppedAtTargetPoint(Point),
    /// The gun finished reloading
    GunReloaded,
    /// Collided with another tank
    Collide(EntityId),
    /// Was hit by a shot
    Hit,
    /// A shot fired by this tank destroyed its target
    TargetDestroyed,
    /// Tanks currently inside the radar cone
    RadarRange(Vec<EntityId>),
    /// Periodic tick
    Heartbeat,
}

impl Event {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Born => "born",
            Self::Stopped => "stopped",
            Self::StoppedAtTargetPoint(_) => "stopped_at_target_point",
            Self::GunReloaded => "gun_reloaded",
            Self::Collide(_) => "collide",
            Self::Hit => "hit",
            Self::TargetDestroyed => "target_destroyed",
            Self::RadarRange(_) => "radar_range",
            Self::Heartbeat => "heartbeat",
        }
    }

    /// Dispatches the event to the matching behavior hook.
    ///
    /// # Errors
    ///
    /// Propagates whatever the hook returns.
    pub fn handle(self, behavior: &mut dyn Behavior, ctl: &mut TankControl<'_>) -> HookResult {
        match self {
            Self::Born => behavior.on_born(ctl),
            Self::Stopped => behavior.on_stopped(ctl),
            Self::StoppedAtTargetPoint(point) => behavior.on_stopped_at_target_point(ctl, point),
            Self::GunReloaded => behavior.on_gun_reloaded(ctl),
            Self::Collide(other) => behavior.on_collide(ctl, other),
            Self::Hit => behavior.on_hit(ctl),
            Self::TargetDestroyed => behavior.on_target_destroyed(ctl),
            Self::RadarRange(ids) => behavior.on_radar_detect(ctl, &ids),
            Self::Heartbeat => behavior.on_heartbeat(ctl),
        }
    }
}

/// FIFO queue of pending events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueue {
    pending: VecDeque<Event>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.pending.iter()
    }

    /// Drops every pending event and returns how many there were.
    pub fn discard(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}
