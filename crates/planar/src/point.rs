//! Field positions.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, GeometryError};
use crate::vector::Vector;

/// A position on the playing field.
///
/// The simulation origin is the bottom-left corner; renderers that draw with a
/// top-left origin convert with [`Point::to_screen`]. A `Point` only changes
/// through explicit translation by a [`Vector`].
///
/// # Example
///
/// ```
/// use planar::{Point, Vector};
///
/// let mut p = Point::new(1.0, 2.0);
/// p += Vector::from_direction(0.0, 3.0);
/// assert!((p.x() - 4.0).abs() < 1e-9);
/// assert!((p.y() - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point(DVec2);

impl Point {
    /// The field origin.
    pub const ORIGIN: Self = Self(DVec2::ZERO);

    /// Creates a point from raw coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Creates a point, rejecting NaN and infinite coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] naming the bad coordinate.
    pub fn try_new(x: f64, y: f64) -> Result<Self, GeometryError> {
        Ok(Self::new(ensure_finite("x", x)?, ensure_finite("y", y)?))
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(self) -> f64 {
        self.0.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(self) -> f64 {
        self.0.y
    }

    /// The point as a glam vector.
    #[must_use]
    pub const fn as_dvec2(self) -> DVec2 {
        self.0
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.0.distance(other.0)
    }

    /// True when `other` lies strictly closer than `radius`.
    #[must_use]
    pub fn near(self, other: Self, radius: f64) -> bool {
        self.distance_to(other) < radius
    }

    /// True when both points fall on the same integer pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn same_pixel(self, other: Self) -> bool {
        self.0.x as i64 == other.0.x as i64 && self.0.y as i64 == other.0.y as i64
    }

    /// Display coordinates for a renderer whose origin is top-left.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_screen(self, field_height: f64) -> (i32, i32) {
        let x = self.0.x as i32;
        let y = field_height as i32 - self.0.y as i32;
        (x, y)
    }
}

impl TryFrom<&[f64]> for Point {
    type Error = GeometryError;

    fn try_from(coords: &[f64]) -> Result<Self, Self::Error> {
        match coords {
            [x, y] => Self::try_new(*x, *y),
            _ => Err(GeometryError::WrongArity { got: coords.len() }),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.0
    }
}

impl Add<Vector> for Point {
    type Output = Self;

    fn add(self, rhs: Vector) -> Self {
        Self(self.0 + rhs.as_dvec2())
    }
}

impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, rhs: Vector) {
        self.0 += rhs.as_dvec2();
    }
}

impl Sub<Vector> for Point {
    type Output = Self;

    fn sub(self, rhs: Vector) -> Self {
        Self(self.0 - rhs.as_dvec2())
    }
}

impl SubAssign<Vector> for Point {
    fn sub_assign(&mut self, rhs: Vector) {
        self.0 -= rhs.as_dvec2();
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p({:.1},{:.1})", self.0.x, self.0.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn near_is_strict() {
        let a = Point::new(0.0, 0.0);
        assert!(a.near(Point::new(4.9, 0.0), 5.0));
        assert!(!a.near(Point::new(5.0, 0.0), 5.0));
    }

    #[test]
    fn try_new_rejects_non_finite() {
        assert!(Point::try_new(1.0, 2.0).is_ok());
        assert_eq!(
            Point::try_new(f64::NAN, 2.0).unwrap_err().to_string(),
            "x must be finite, got NaN"
        );
        assert!(matches!(
            Point::try_new(1.0, f64::INFINITY),
            Err(GeometryError::NonFinite { what: "y", .. })
        ));
    }

    #[test]
    fn try_from_slice_checks_arity() {
        let ok: &[f64] = &[1.0, 2.0];
        assert_eq!(Point::try_from(ok), Ok(Point::new(1.0, 2.0)));

        let short: &[f64] = &[1.0];
        assert_eq!(
            Point::try_from(short),
            Err(GeometryError::WrongArity { got: 1 })
        );

        let long: &[f64] = &[1.0, 2.0, 3.0];
        assert_eq!(
            Point::try_from(long),
            Err(GeometryError::WrongArity { got: 3 })
        );
    }

    #[test]
    fn translation_by_vector() {
        let p = Point::new(10.0, 10.0);
        let v = Vector::from_direction(90.0, 5.0);
        let moved = p + v;
        assert!((moved.x() - 10.0).abs() < 1e-9);
        assert!((moved.y() - 15.0).abs() < 1e-9);

        let back = moved - v;
        assert!(back.distance_to(p) < 1e-9);
    }

    #[test]
    fn screen_flip() {
        let p = Point::new(20.5, 100.7);
        assert_eq!(p.to_screen(480.0), (20, 380));
    }

    #[test]
    fn same_pixel_truncates() {
        assert!(Point::new(1.2, 3.9).same_pixel(Point::new(1.8, 3.1)));
        assert!(!Point::new(1.2, 3.9).same_pixel(Point::new(2.0, 3.1)));
    }

    #[test]
    fn display_format() {
        assert_eq!(Point::new(1.26, 2.0).to_string(), "p(1.3,2.0)");
    }

    #[test]
    fn serialization_roundtrip() {
        let p = Point::new(12.5, -3.25);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[12.5,-3.25]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
