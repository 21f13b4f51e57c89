//! # Robotank Core
//!
//! Deterministic tank combat simulation for robotank.
//!
//! Tanks, shots and explosions move on a fixed-size field in fixed ticks.
//! Tanks are driven by [`Behavior`]s that react to events (born, stopped,
//! gun reloaded, hit, collided, radar contact, ...) and steer their tank
//! through a [`TankControl`] handle.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): `Tank`, `Shot`, `Explosion`, each embedding a
//!   `Body` motion state machine and keyed by [`EntityId`]
//! - **Behaviors** ([`behavior`]): hook-per-event trait objects owned by the
//!   scene, one per tank
//! - **Scene** ([`scene`]): entity storage and the fixed-order tick
//! - **Boundary** ([`snapshot`], [`control`], [`transport`]): value-copied
//!   snapshots out, control states in, over a pluggable link
//! - **Game loop** ([`game_loop`]): tick floor, hold/step debugging, shutdown
//!
//! ## Usage
//!
//! ```
//! use robotank_core::{ControlState, DirectLink, GameLoop, Scene, SimConfig, TankSpec};
//! use robotank_core::snapshot::WorldSnapshot;
//! use std::time::Duration;
//!
//! let mut scene = Scene::new(SimConfig::default().with_seed(7)).unwrap();
//! for _ in 0..4 {
//!     scene.spawn_target(TankSpec::default(), true).unwrap();
//! }
//!
//! let renderer = |s: &WorldSnapshot| {
//!     if s.tick >= 50 { ControlState::the_end() } else { ControlState::default() }
//! };
//! let mut game = GameLoop::new(scene, DirectLink::new(renderer)).with_tick_floor(Duration::ZERO);
//! let summary = game.run().unwrap();
//! assert_eq!(summary.ticks, 50);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod behavior;
pub mod config;
pub mod control;
pub mod entity;
pub mod error;
pub mod event;
pub mod game_loop;
pub mod gun;
pub mod radar;
pub mod scene;
pub mod snapshot;
pub mod transport;
pub mod world_view;

// Re-exports for convenience
pub use behavior::{Behavior, HookResult, Idle, Roamer, StaticTarget, TankControl};
pub use config::SimConfig;
pub use control::ControlState;
pub use entity::{EntityId, EntityTag, Target, TankKind, TankSpec};
pub use error::{ConfigError, RunError, SceneError, TargetError, TransportError};
pub use event::Event;
pub use game_loop::{GameLoop, RunSummary};
pub use scene::{HitOutcome, Scene};
pub use snapshot::{ObjectState, WorldSnapshot};
pub use transport::{ChannelLink, DirectLink, Renderer, RendererLink};
pub use world_view::WorldView;

#[cfg(test)]
mod tests;
