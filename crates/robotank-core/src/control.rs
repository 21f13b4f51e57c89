//! Renderer input flowing back into the game loop.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// What the renderer wants the loop to do next.
///
/// The loop only reacts when a polled state differs from the last one it
/// applied, so a renderer may resend the same state every frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    /// Run exactly one tick while held
    pub one_step: bool,
    /// Toggle debug output and hold mode
    pub switch_debug: bool,
    /// Stop the loop
    pub the_end: bool,
    /// Tanks picked in the UI
    pub selected_ids: Vec<EntityId>,
}

impl ControlState {
    /// A state asking the loop to stop.
    #[must_use]
    pub fn the_end() -> Self {
        Self {
            the_end: true,
            ..Self::default()
        }
    }

    /// A state asking for a single tick while held.
    #[must_use]
    pub fn one_step() -> Self {
        Self {
            one_step: true,
            ..Self::default()
        }
    }

    /// A state toggling debug mode.
    #[must_use]
    pub fn switch_debug() -> Self {
        Self {
            switch_debug: true,
            ..Self::default()
        }
    }

    /// Replaces the selection.
    #[must_use]
    pub fn with_selection(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.selected_ids = ids.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_asks_for_nothing() {
        let state = ControlState::default();
        assert!(!state.one_step && !state.switch_debug && !state.the_end);
        assert!(state.selected_ids.is_empty());
    }

    #[test]
    fn equality_includes_selection() {
        let a = ControlState::default().with_selection([EntityId::new(1)]);
        let b = ControlState::default().with_selection([EntityId::new(2)]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn json_round_trip() {
        let state = ControlState::switch_debug().with_selection([EntityId::new(3), EntityId::new(9)]);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"selected_ids\":[3,9]"));
        let back: ControlState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
