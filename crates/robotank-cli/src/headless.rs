//! A renderer that draws nothing: it logs a summary now and then and ends
//! the run after a fixed number of ticks.

use robotank_core::entity::EntityTag;
use robotank_core::{ControlState, Renderer, WorldSnapshot};
use tracing::{debug, info};

/// Logs progress and asks the loop to stop once `until` ticks are done.
#[derive(Debug, Clone)]
pub struct Headless {
    until: u64,
    report_every: u64,
    last_report: Option<u64>,
}

impl Headless {
    /// Stops after `until` ticks, logging every `report_every` ticks
    /// (never when zero).
    pub fn new(until: u64, report_every: u64) -> Self {
        Self {
            until,
            report_every,
            last_report: None,
        }
    }

    fn report(&mut self, snapshot: &WorldSnapshot) {
        if self.report_every == 0
            || snapshot.tick % self.report_every != 0
            || self.last_report == Some(snapshot.tick)
        {
            return;
        }
        self.last_report = Some(snapshot.tick);
        info!(
            tick = snapshot.tick,
            tanks = snapshot.with_tag(EntityTag::Tank).count(),
            shots = snapshot.with_tag(EntityTag::Shot).count(),
            explosions = snapshot.with_tag(EntityTag::Explosion).count(),
            "arena"
        );
        for tank in snapshot.with_tag(EntityTag::Tank) {
            debug!(
                tank = %tank.id,
                coord = %tank.coord,
                armor = tank.armor.unwrap_or_default(),
                seen_by = tank.detected_by.len(),
                "tank"
            );
        }
    }
}

impl Renderer for Headless {
    fn render(&mut self, snapshot: &WorldSnapshot) -> ControlState {
        self.report(snapshot);
        if snapshot.tick >= self.until {
            ControlState::the_end()
        } else {
            ControlState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            tick,
            objects: Vec::new(),
        }
    }

    #[test]
    fn ends_at_the_limit() {
        let mut headless = Headless::new(10, 0);
        assert_eq!(headless.render(&frame(9)), ControlState::default());
        assert_eq!(headless.render(&frame(10)), ControlState::the_end());
    }

    #[test]
    fn reports_each_tick_once() {
        let mut headless = Headless::new(100, 5);
        headless.render(&frame(5));
        assert_eq!(headless.last_report, Some(5));
        headless.render(&frame(6));
        assert_eq!(headless.last_report, Some(5));
    }
}
