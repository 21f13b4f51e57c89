//! Error types for the engine.
//!
//! Each concern gets its own enum so callers can match on exactly what can go
//! wrong at that seam:
//!
//! - [`ConfigError`]: loading and validating [`SimConfig`](crate::config::SimConfig)
//! - [`TargetError`]: a motion command given a target it cannot use
//! - [`SceneError`]: a tick that cannot complete
//! - [`TransportError`]: the renderer link failed
//! - [`RunError`]: anything that stops the game loop

use planar::GeometryError;
use thiserror::Error;

use crate::entity::EntityId;

/// Configuration could not be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid configuration JSON.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside the range the engine supports.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: String) -> Self {
        Self::Invalid { field, reason }
    }
}

/// A motion command received a target it cannot act on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TargetError {
    /// The target kind is not accepted by this operation.
    #[error("{operation} does not accept {given} targets (accepts {accepted})")]
    Unsupported {
        /// Operation that rejected the target
        operation: &'static str,
        /// Kind of target that was given
        given: &'static str,
        /// Kinds the operation accepts
        accepted: &'static str,
    },
    /// The target entity is not live.
    #[error("target entity {0} does not exist")]
    UnknownEntity(EntityId),
    /// An angle, speed or point was NaN or infinite.
    #[error("invalid motion command: {0}")]
    Geometry(#[from] GeometryError),
}

/// A tick could not complete.
#[derive(Debug, Error)]
pub enum SceneError {
    /// One entity kept generating events past the per-drain limit.
    #[error("entity {id} handled more than {limit} events in one drain")]
    EventStorm {
        /// Entity whose queue never emptied
        id: EntityId,
        /// Configured limit
        limit: usize,
    },
    /// An operation named an entity that is not live.
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    /// A behavior issued a motion command with a bad target.
    #[error(transparent)]
    Target(#[from] TargetError),
    /// A tank was spawned at a non-finite position or course.
    #[error("invalid spawn: {0}")]
    Spawn(#[from] GeometryError),
}

/// The renderer link failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The other side hung up.
    #[error("renderer link disconnected")]
    Disconnected,
    /// The renderer thread panicked.
    #[error("renderer thread panicked")]
    RendererPanicked,
}

/// The game loop stopped with an error.
#[derive(Debug, Error)]
pub enum RunError {
    /// A tick failed.
    #[error("simulation failed at tick {tick}")]
    Scene {
        /// Tick that failed
        tick: u64,
        /// Cause
        #[source]
        source: SceneError,
    },
    /// The renderer link failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
