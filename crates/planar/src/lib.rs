//! # Planar
//!
//! Planar geometry substrate for the robotank simulation.
//!
//! Everything in the arena is expressed with two value types:
//!
//! - [`Point`]: a position on the field
//! - [`Vector`]: a direction plus magnitude, with a cached angle
//!
//! Angles are degrees, measured counter-clockwise from the positive x axis,
//! and always normalised into `[0, 360)`. The same convention is used for
//! turning, radar and motion math.
//!
//! ## Quick Start
//!
//! ```
//! use planar::{Point, Vector, bearing};
//!
//! let from = Point::new(10.0, 10.0);
//! let to = Point::new(10.0, 20.0);
//!
//! let v = Vector::from_points(from, to, Some(5.0));
//! assert!((v.magnitude() - 5.0).abs() < 1e-9);
//! assert!((v.angle() - 90.0).abs() < 1e-9);
//! assert!((bearing(10.0, 0.0) - 90.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod angle;
pub mod error;
pub mod point;
pub mod vector;

// Re-exports for convenience
pub use angle::{angular_distance, bearing, normalise_angle};
pub use error::GeometryError;
pub use point::Point;
pub use vector::Vector;
