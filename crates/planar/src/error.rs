//! Errors raised by the fallible geometry constructors.

use thiserror::Error;

/// Invalid input handed to a geometry constructor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A coordinate, angle or magnitude was NaN or infinite.
    #[error("{what} must be finite, got {value}")]
    NonFinite {
        /// Which argument was rejected
        what: &'static str,
        /// The offending value
        value: f64,
    },

    /// A coordinate sequence did not have exactly two elements.
    #[error("a point needs exactly 2 coordinates, got {got}")]
    WrongArity {
        /// Number of coordinates supplied
        got: usize,
    },

    /// A clamp magnitude was negative.
    #[error("vector magnitude must be non-negative, got {0}")]
    NegativeMagnitude(f64),
}

pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { what, value })
    }
}
