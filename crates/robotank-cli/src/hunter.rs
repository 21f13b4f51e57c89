//! Sample AI: searches the field at random and hunts whatever target its
//! radar or bumper finds first.

use planar::Point;
use robotank_core::behavior::{Behavior, HookResult, TankControl};
use robotank_core::entity::{EntityId, TankKind};

/// Targets closer than this are engaged by turning in place instead of
/// driving toward them.
const CLOSE_RANGE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Search,
    Hunt,
}

/// A player tank that roams until it sees a target, then chases and shoots
/// it. Other player tanks are never targeted.
#[derive(Debug, Clone)]
pub struct Hunter {
    mode: Mode,
    target: Option<EntityId>,
    speed: f64,
}

impl Default for Hunter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hunter {
    /// Travel speed per tick.
    pub const SPEED: f64 = 3.0;

    /// A hunter that starts out searching.
    pub fn new() -> Self {
        Self {
            mode: Mode::Search,
            target: None,
            speed: Self::SPEED,
        }
    }

    /// The current target if it is still on the field.
    fn live_target(&self, ctl: &TankControl<'_>) -> Option<EntityId> {
        self.target.filter(|id| ctl.world().tank(*id).is_some())
    }

    fn to_search(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        self.mode = Mode::Search;
        self.target = None;
        let point = ctl.random_point();
        ctl.move_at(point, self.speed)?;
        Ok(())
    }

    fn to_hunt(&mut self, ctl: &mut TankControl<'_>, target: EntityId) -> HookResult {
        self.mode = Mode::Hunt;
        self.target = Some(target);
        if ctl.distance_to(target)? > CLOSE_RANGE {
            ctl.move_at(target, self.speed)?;
        } else {
            ctl.turn_to(target)?;
        }
        ctl.fire();
        Ok(())
    }

    /// Picks the closest huntable tank among `candidates`, keeping the
    /// current target unless something is nearer.
    fn make_decision(&mut self, ctl: &mut TankControl<'_>, candidates: &[EntityId]) -> HookResult {
        let current = self.live_target(ctl);
        let mut best = None;
        let mut best_distance = match current {
            Some(id) => ctl.distance_to(id)?,
            None => f64::INFINITY,
        };

        for &id in candidates {
            let Some(kind) = ctl.world().tank(id).map(|tank| tank.kind()) else {
                continue;
            };
            if kind == TankKind::Player {
                continue;
            }
            let distance = ctl.distance_to(id)?;
            if distance < best_distance {
                best = Some(id);
                best_distance = distance;
            }
        }

        match (best, self.mode) {
            (Some(candidate), _) => self.to_hunt(ctl, candidate),
            (None, Mode::Search) => Ok(()),
            (None, Mode::Hunt) => match current {
                Some(target) => self.to_hunt(ctl, target),
                None => self.to_search(ctl),
            },
        }
    }
}

impl Behavior for Hunter {
    fn name(&self) -> &'static str {
        "hunter"
    }

    fn on_born(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        self.to_search(ctl)
    }

    fn on_stopped(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        self.to_search(ctl)
    }

    fn on_stopped_at_target_point(&mut self, ctl: &mut TankControl<'_>, _point: Point) -> HookResult {
        self.to_search(ctl)
    }

    fn on_gun_reloaded(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        if self.mode != Mode::Hunt {
            return Ok(());
        }
        let armed_target = self
            .live_target(ctl)
            .and_then(|id| ctl.world().tank(id))
            .is_some_and(|tank| tank.armor() > 0);
        if armed_target {
            ctl.fire();
            Ok(())
        } else {
            self.to_search(ctl)
        }
    }

    fn on_target_destroyed(&mut self, ctl: &mut TankControl<'_>) -> HookResult {
        self.to_search(ctl)
    }

    fn on_collide(&mut self, ctl: &mut TankControl<'_>, other: EntityId) -> HookResult {
        ctl.debug(format_args!("collided with {other} while {:?}", self.mode));
        if self.mode == Mode::Search {
            self.make_decision(ctl, &[other])?;
        }
        Ok(())
    }

    fn on_radar_detect(&mut self, ctl: &mut TankControl<'_>, detected: &[EntityId]) -> HookResult {
        if ctl.is_debug_enabled() {
            for id in detected {
                if let Some(tank) = ctl.world().tank(*id) {
                    ctl.debug(format_args!("radar: {id} with armor {}", tank.armor()));
                }
            }
            ctl.debug(format_args!("radar while {:?}, target {:?}", self.mode, self.target));
        }
        self.make_decision(ctl, detected)
    }
}
