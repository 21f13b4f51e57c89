//! Test helpers: scene factories and a behavior that records its events.

use std::cell::RefCell;
use std::rc::Rc;

use planar::Point;

use crate::behavior::{Behavior, HookResult, TankControl};
use crate::config::SimConfig;
use crate::entity::{EntityId, TankSpec};
use crate::event::Event;
use crate::scene::Scene;

// =============================================================================
// Scenes
// =============================================================================

/// A scene with default tuning.
pub fn new_scene() -> Scene {
    scene_with(SimConfig::default())
}

/// A scene with the given configuration.
pub fn scene_with(config: SimConfig) -> Scene {
    Scene::new(config).expect("test config is valid")
}

/// Ticks `scene` `n` times, failing the test on any error.
pub fn run_ticks(scene: &mut Scene, n: u64) {
    for _ in 0..n {
        scene.tick().expect("tick succeeds");
    }
}

// =============================================================================
// Recording behavior
// =============================================================================

/// Events seen by a [`Recorder`], in handling order.
pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// A behavior that does nothing but remember which hooks fired.
pub struct Recorder {
    log: EventLog,
}

impl Recorder {
    fn record(&self, event: Event) -> HookResult {
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl Behavior for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn on_born(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        self.record(Event::Born)
    }

    fn on_stopped(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        self.record(Event::Stopped)
    }

    fn on_stopped_at_target_point(&mut self, _ctl: &mut TankControl<'_>, point: Point) -> HookResult {
        self.record(Event::StoppedAtTargetPoint(point))
    }

    fn on_gun_reloaded(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        self.record(Event::GunReloaded)
    }

    fn on_hit(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        self.record(Event::Hit)
    }

    fn on_collide(&mut self, _ctl: &mut TankControl<'_>, other: EntityId) -> HookResult {
        self.record(Event::Collide(other))
    }

    fn on_target_destroyed(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        self.record(Event::TargetDestroyed)
    }

    fn on_radar_detect(&mut self, _ctl: &mut TankControl<'_>, detected: &[EntityId]) -> HookResult {
        self.record(Event::RadarRange(detected.to_vec()))
    }

    fn on_heartbeat(&mut self, _ctl: &mut TankControl<'_>) -> HookResult {
        self.record(Event::Heartbeat)
    }
}

/// Spawns a recording player tank at `(x, y)` facing `course`.
pub fn spawn_recorder(scene: &mut Scene, x: f64, y: f64, course: f64) -> (EntityId, EventLog) {
    let log = EventLog::default();
    let id = scene.spawn_tank(
        TankSpec::default().at((x, y)).facing(course),
        Recorder { log: Rc::clone(&log) },
    )
    .unwrap();
    (id, log)
}

/// How many logged events have the given name.
pub fn count(log: &EventLog, name: &str) -> usize {
    log.borrow().iter().filter(|event| event.name() == name).count()
}
