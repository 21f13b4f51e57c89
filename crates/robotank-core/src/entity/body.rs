//! Shared motion and turning state machine.
//!
//! ```text
//!            turn_to / move_*          turn done, move pending
//!  Stopped ───────────────────▶ Turning ─────────────────────▶ Moving
//!     ▲                            │                             │
//!     └──────── turn done ─────────┘                             │
//!     └──────────── arrival / boundary / stop() ─────────────────┘
//! ```
//!
//! Turning is skipped when the body is not revolvable or its course already
//! matches the heading to the integer degree.

use glam::DVec2;
use planar::{normalise_angle, Point, Vector};
use serde::{Deserialize, Serialize};

use crate::config::{FieldSize, SimConfig};
use crate::entity::{EntityId, EntityTag};
use crate::event::{Event, EventQueue};

/// Motion phase of a [`Body`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    /// At rest
    Stopped,
    /// Rotating the course toward the heading
    Turning,
    /// Translating by the heading every tick
    Moving,
}

/// Position, orientation, motion intent and event queue of one entity.
#[derive(Debug, Clone)]
pub struct Body {
    id: EntityId,
    tag: EntityTag,
    coord: Point,
    heading: Vector,
    course: f64,
    state: MotionState,
    target_coord: Point,
    radius: f64,
    revolvable: bool,
    need_moving: bool,
    stop_reported: bool,
    max_speed: f64,
    heartbeat_countdown: u32,
    events: EventQueue,
}

impl Body {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: EntityId,
        tag: EntityTag,
        coord: Point,
        course: f64,
        radius: f64,
        revolvable: bool,
        max_speed: f64,
        heartbeat_interval: u32,
    ) -> Self {
        let heading = Vector::from_direction(course, 0.0);
        Self {
            id,
            tag,
            coord,
            heading,
            course: heading.angle(),
            state: MotionState::Stopped,
            target_coord: coord,
            radius,
            revolvable,
            need_moving: false,
            stop_reported: false,
            max_speed,
            heartbeat_countdown: heartbeat_interval,
            events: EventQueue::new(),
        }
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Entity kind.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Current position.
    #[must_use]
    pub const fn coord(&self) -> Point {
        self.coord
    }

    /// Desired direction and per-tick speed.
    #[must_use]
    pub const fn heading(&self) -> Vector {
        self.heading
    }

    /// Current facing in degrees.
    #[must_use]
    pub const fn course(&self) -> f64 {
        self.course
    }

    /// Motion phase.
    #[must_use]
    pub const fn state(&self) -> MotionState {
        self.state
    }

    /// Where the current move is headed.
    #[must_use]
    pub const fn target_coord(&self) -> Point {
        self.target_coord
    }

    /// Collision radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether turning takes time.
    #[must_use]
    pub const fn is_revolvable(&self) -> bool {
        self.revolvable
    }

    /// Whether a move is waiting for the turn to finish.
    #[must_use]
    pub const fn is_move_pending(&self) -> bool {
        self.need_moving
    }

    /// Speed cap for move commands.
    #[must_use]
    pub const fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Pending events.
    #[must_use]
    pub const fn events(&self) -> &EventQueue {
        &self.events
    }

    pub(crate) fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn pop_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    pub(crate) fn discard_events(&mut self) -> usize {
        self.events.discard()
    }

    pub(crate) fn set_coord(&mut self, coord: Point) {
        self.coord = coord;
    }

    pub(crate) fn translate(&mut self, delta: DVec2) {
        self.coord = Point::from(self.coord.as_dvec2() + delta);
        self.stop_reported = false;
    }

    fn needs_turning(&self) -> bool {
        self.revolvable && self.course.trunc() != self.heading.angle().trunc()
    }

    fn begin_motion(&mut self) {
        self.need_moving = true;
        self.stop_reported = false;
        self.state = if self.needs_turning() {
            MotionState::Turning
        } else {
            MotionState::Moving
        };
    }

    /// Turn in place to face `point`. Cancels any pending move.
    pub(crate) fn turn_toward(&mut self, point: Point) {
        self.heading = Vector::from_points(self.coord, point, Some(0.0));
        self.need_moving = false;
        self.stop_reported = false;
        self.state = MotionState::Turning;
    }

    /// Turn in place to face `angle` degrees. Cancels any pending move.
    pub(crate) fn turn_to_angle(&mut self, angle: f64) {
        self.heading = Vector::from_direction(angle, 0.0);
        self.need_moving = false;
        self.stop_reported = false;
        self.state = MotionState::Turning;
    }

    /// Move along `direction` at up to `speed` per tick until stopped.
    pub(crate) fn move_in(&mut self, direction: f64, speed: f64, far_target_factor: f64) {
        let speed = speed.clamp(0.0, self.max_speed);
        self.heading = Vector::from_direction(direction, speed);
        self.target_coord = self.coord + self.heading * far_target_factor;
        self.begin_motion();
    }

    /// Move toward `point` at up to `speed` per tick, stopping on arrival.
    pub(crate) fn move_at(&mut self, point: Point, speed: f64) {
        let speed = speed.clamp(0.0, self.max_speed);
        self.target_coord = point;
        self.heading = Vector::from_points(self.coord, point, Some(speed));
        self.begin_motion();
    }

    /// Come to rest and emit [`Event::Stopped`]. Further calls emit nothing
    /// until the body is commanded or pushed again.
    pub(crate) fn stop(&mut self) {
        self.state = MotionState::Stopped;
        self.need_moving = false;
        if !self.stop_reported {
            self.stop_reported = true;
            self.events.push(Event::Stopped);
        }
    }

    fn finish_turn(&mut self) {
        self.course = self.heading.angle();
        if self.need_moving {
            self.state = MotionState::Moving;
        } else {
            self.state = MotionState::Stopped;
            self.events.push(Event::Stopped);
        }
    }

    /// Advances the body by one tick: turning, moving, boundary check and
    /// heartbeat, in that order.
    pub(crate) fn step(&mut self, config: &SimConfig) {
        if self.state == MotionState::Turning {
            self.step_turn(config.tank.turn_rate);
        }

        if self.state == MotionState::Moving {
            self.coord += self.heading;
            if self.coord.near(self.target_coord, config.arrival_radius) {
                let target = self.target_coord;
                self.stop();
                self.events.push(Event::StoppedAtTargetPoint(target));
            }
        }

        self.keep_inside(config.field);

        self.heartbeat_countdown = self.heartbeat_countdown.saturating_sub(1);
        if self.heartbeat_countdown == 0 {
            self.events.push(Event::Heartbeat);
            self.heartbeat_countdown = config.heartbeat_interval;
        }
    }

    fn step_turn(&mut self, turn_rate: f64) {
        if !self.revolvable {
            self.finish_turn();
            return;
        }
        let delta = self.heading.angle() - self.course;
        if delta.abs() < turn_rate {
            self.finish_turn();
        } else if (-180.0 < delta && delta < 0.0) || delta > 180.0 {
            self.course = normalise_angle(self.course - turn_rate);
        } else {
            self.course = normalise_angle(self.course + turn_rate);
        }
    }

    /// Pushes the body back inside the field, one unit past the edge it
    /// crossed, and stops it.
    fn keep_inside(&mut self, field: FieldSize) {
        let r = self.radius;
        let mut p = self.coord.as_dvec2();
        let mut crossed = false;

        let left = r - p.x;
        if left > 0.0 {
            p.x += left + 1.0;
            crossed = true;
        }
        let bottom = r - p.y;
        if bottom > 0.0 {
            p.y += bottom + 1.0;
            crossed = true;
        }
        let right = p.x - (field.width - r);
        if right > 0.0 {
            p.x -= right + 1.0;
            crossed = true;
        }
        let top = p.y - (field.height - r);
        if top > 0.0 {
            p.y -= top + 1.0;
            crossed = true;
        }

        if crossed {
            self.coord = Point::from(p);
            self.stop();
        }
    }
}
