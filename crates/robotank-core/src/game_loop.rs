//! The fixed-rate driver tying a [`Scene`] to a renderer.
//!
//! Each cycle the loop:
//!
//! 1. polls the newest [`ControlState`] and acts on it: `the_end` stops the
//!    loop, `switch_debug` toggles debug and hold mode together, and a
//!    changed selection is copied onto the tanks. The action flags are
//!    honored on every state received, so a renderer that keeps sending
//!    `one_step` keeps stepping.
//! 2. ticks the scene unless held; while held only `one_step` ticks
//! 3. publishes a snapshot, so a held renderer keeps receiving frames
//! 4. sleeps whatever is left of the tick floor
//!
//! Scene and transport errors end the loop immediately; the link is closed
//! either way.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::control::ControlState;
use crate::entity::EntityId;
use crate::error::RunError;
use crate::scene::Scene;
use crate::transport::RendererLink;

/// How a finished run went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks executed by this run
    pub ticks: u64,
    /// Tanks still alive at the end, in id order
    pub survivors: Vec<EntityId>,
}

/// Drives a scene and a renderer link until the renderer asks to stop.
pub struct GameLoop<L> {
    scene: Scene,
    link: L,
    tick_floor: Duration,
    hold: bool,
    selection: Vec<EntityId>,
}

impl<L> fmt::Debug for GameLoop<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLoop")
            .field("scene", &self.scene)
            .field("tick_floor", &self.tick_floor)
            .field("hold", &self.hold)
            .finish_non_exhaustive()
    }
}

impl<L: RendererLink> GameLoop<L> {
    /// A loop using the scene's configured tick floor.
    pub fn new(scene: Scene, link: L) -> Self {
        Self {
            tick_floor: scene.config().tick_floor(),
            scene,
            link,
            hold: false,
            selection: Vec::new(),
        }
    }

    /// Overrides the minimum wall-clock duration of one cycle.
    #[must_use]
    pub fn with_tick_floor(mut self, tick_floor: Duration) -> Self {
        self.tick_floor = tick_floor;
        self
    }

    /// The scene being driven.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene, for spawning before the run.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The renderer link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// True while ticks only happen on `one_step`.
    pub const fn is_held(&self) -> bool {
        self.hold
    }

    /// Runs until the renderer sends `the_end`, then closes the link.
    ///
    /// # Errors
    ///
    /// [`RunError::Scene`] when a tick fails, [`RunError::Transport`] when the
    /// renderer disappears or panics. A scene error wins over a failure to
    /// close the link.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        info!(
            tanks = self.scene.tank_count(),
            tick_floor_ms = u64::try_from(self.tick_floor.as_millis()).unwrap_or(u64::MAX),
            "game loop started"
        );
        let outcome = self.drive();
        let closed = self.link.close();
        let summary = outcome?;
        closed?;
        info!(ticks = summary.ticks, survivors = summary.survivors.len(), "game loop finished");
        Ok(summary)
    }

    fn drive(&mut self) -> Result<RunSummary, RunError> {
        let first_tick = self.scene.tick_number();
        loop {
            let cycle = Instant::now();

            let mut step = false;
            if let Some(control) = self.link.poll_control()? {
                if control.the_end {
                    break;
                }
                step = control.one_step;
                self.apply(control);
            }

            if !self.hold || step {
                let tick = self.scene.tick_number();
                self.scene
                    .tick()
                    .map_err(|source| RunError::Scene { tick, source })?;
            }
            self.link.publish(self.scene.snapshot())?;

            if let Some(rest) = self.tick_floor.checked_sub(cycle.elapsed()) {
                thread::sleep(rest);
            }
        }

        Ok(RunSummary {
            ticks: self.scene.tick_number() - first_tick,
            survivors: self.scene.tanks().map(|tank| tank.id()).collect(),
        })
    }

    fn apply(&mut self, control: ControlState) {
        if control.selected_ids != self.selection {
            self.scene.apply_selection(&control.selected_ids);
            self.selection = control.selected_ids;
        }
        if control.switch_debug {
            let enabled = !self.scene.is_debug();
            self.scene.set_debug(enabled);
            self.hold = enabled;
            info!(debug = enabled, "debug mode switched");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Idle;
    use crate::config::SimConfig;
    use crate::entity::TankSpec;
    use crate::snapshot::WorldSnapshot;
    use crate::transport::DirectLink;

    fn scene() -> Scene {
        let mut scene = Scene::new(SimConfig::default()).unwrap();
        scene.spawn_tank(TankSpec::default().at((100.0, 100.0)), Idle).unwrap();
        scene
    }

    #[test]
    fn stops_on_the_end() {
        let link = DirectLink::new(|s: &WorldSnapshot| {
            if s.tick >= 5 {
                ControlState::the_end()
            } else {
                ControlState::default()
            }
        });
        let mut game = GameLoop::new(scene(), link).with_tick_floor(Duration::ZERO);
        let summary = game.run().unwrap();
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.survivors.len(), 1);
    }

    #[test]
    fn switch_debug_holds_until_one_step() {
        // Frame-by-frame script: hold, wait, step, wait, step again, stop.
        let script = vec![
            ControlState::switch_debug(),
            ControlState::default(),
            ControlState::one_step(),
            ControlState::default(),
            ControlState::one_step(),
            ControlState::the_end(),
        ];
        let mut frames = script.into_iter();
        let link = DirectLink::new(move |_: &WorldSnapshot| frames.next().unwrap_or_else(ControlState::the_end));
        let mut game = GameLoop::new(scene(), link).with_tick_floor(Duration::ZERO);

        let summary = game.run().unwrap();
        // One tick before the first control arrives, then two single steps.
        assert_eq!(summary.ticks, 3);
        assert!(game.is_held());
        assert!(game.scene().is_debug());
    }

    #[test]
    fn repeated_one_step_keeps_stepping() {
        let mut script = vec![ControlState::switch_debug()];
        script.extend(std::iter::repeat(ControlState::one_step()).take(5));
        script.push(ControlState::the_end());
        let mut frames = script.into_iter();
        let link = DirectLink::new(move |_: &WorldSnapshot| frames.next().unwrap_or_else(ControlState::the_end));
        let mut game = GameLoop::new(scene(), link).with_tick_floor(Duration::ZERO);

        let summary = game.run().unwrap();
        assert_eq!(summary.ticks, 6);
        assert!(game.is_held());
    }

    #[test]
    fn second_switch_debug_releases_hold() {
        let script = vec![
            ControlState::switch_debug(),
            ControlState::switch_debug(),
            ControlState::default(),
            ControlState::default(),
            ControlState::the_end(),
        ];
        let mut frames = script.into_iter();
        let link = DirectLink::new(move |_: &WorldSnapshot| frames.next().unwrap_or_else(ControlState::the_end));
        let mut game = GameLoop::new(scene(), link).with_tick_floor(Duration::ZERO);

        let summary = game.run().unwrap();
        assert_eq!(summary.ticks, 4);
        assert!(!game.is_held());
        assert!(!game.scene().is_debug());
    }

    #[test]
    fn selection_reaches_tanks() {
        let scene = scene();
        let id = scene.tanks().next().unwrap().id();
        let mut sent = 0;
        let link = DirectLink::new(move |_: &WorldSnapshot| {
            sent += 1;
            if sent < 3 {
                ControlState::default().with_selection([id])
            } else {
                ControlState::the_end()
            }
        });
        let mut game = GameLoop::new(scene, link).with_tick_floor(Duration::ZERO);
        game.run().unwrap();
        assert!(game.scene().tank(id).unwrap().is_selected());
    }
}
