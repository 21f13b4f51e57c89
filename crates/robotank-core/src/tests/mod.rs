//! Scenario tests for the scene, boundary and game loop.
//!
//! - `determinism.rs`: same seed and spawns replay identically
//! - `integration.rs`: end-to-end tick scenarios (collisions, radar, hits,
//!   kills, snapshots, transport)
//! - `helpers.rs`: scene factories and a recording behavior

mod determinism;
mod helpers;
