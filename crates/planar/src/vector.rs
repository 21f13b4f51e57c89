//! Direction-and-magnitude vectors.

use std::fmt;
use std::ops::{Add, Mul, Neg};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::angle::{bearing, normalise_angle};
use crate::error::{ensure_finite, GeometryError};
use crate::point::Point;

/// A displacement with a cached direction and magnitude.
///
/// The angle is always normalised into `[0, 360)`. The magnitude is stored
/// rather than derived so a clamped zero-length vector can still report the
/// requested magnitude (see [`Vector::from_points`]).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    delta: DVec2,
    angle: f64,
    magnitude: f64,
}

impl Vector {
    /// The zero vector, pointing along 0°.
    pub const ZERO: Self = Self {
        delta: DVec2::ZERO,
        angle: 0.0,
        magnitude: 0.0,
    };

    /// Vector from `from` to `to`.
    ///
    /// With `clamp` set, the magnitude is forced to that value while the
    /// direction is preserved. When the two points coincide the direction is
    /// undefined: the delta stays zero, the magnitude still becomes the clamp
    /// value and the angle is whatever `bearing(0, 0)` yields. Callers must
    /// not rely on the angle in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use planar::{Point, Vector};
    ///
    /// let v = Vector::from_points(Point::new(0.0, 0.0), Point::new(-3.0, 0.0), Some(1.0));
    /// assert!((v.angle() - 180.0).abs() < 1e-9);
    /// assert!((v.dx() + 1.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn from_points(from: Point, to: Point, clamp: Option<f64>) -> Self {
        let delta = to.as_dvec2() - from.as_dvec2();
        let length = delta.length();
        let angle = bearing(delta.y, delta.x);
        match clamp {
            Some(magnitude) => {
                let delta = if length > 0.0 {
                    delta * (magnitude / length)
                } else {
                    delta
                };
                Self {
                    delta,
                    angle,
                    magnitude,
                }
            }
            None => Self {
                delta,
                angle,
                magnitude: length,
            },
        }
    }

    /// Checked variant of [`Vector::from_points`].
    ///
    /// # Errors
    ///
    /// Rejects non-finite coordinates and negative or non-finite clamps.
    pub fn try_from_points(from: Point, to: Point, clamp: Option<f64>) -> Result<Self, GeometryError> {
        for (what, value) in [
            ("from.x", from.x()),
            ("from.y", from.y()),
            ("to.x", to.x()),
            ("to.y", to.y()),
        ] {
            ensure_finite(what, value)?;
        }
        if let Some(magnitude) = clamp {
            ensure_finite("magnitude", magnitude)?;
            if magnitude < 0.0 {
                return Err(GeometryError::NegativeMagnitude(magnitude));
            }
        }
        Ok(Self::from_points(from, to, clamp))
    }

    /// Vector pointing at `angle` degrees with the given magnitude.
    #[must_use]
    pub fn from_direction(angle: f64, magnitude: f64) -> Self {
        let radians = angle.to_radians();
        Self {
            delta: DVec2::new(radians.cos(), radians.sin()) * magnitude,
            angle: normalise_angle(angle),
            magnitude,
        }
    }

    /// Checked variant of [`Vector::from_direction`].
    ///
    /// # Errors
    ///
    /// Rejects a non-finite angle or magnitude.
    pub fn try_from_direction(angle: f64, magnitude: f64) -> Result<Self, GeometryError> {
        ensure_finite("angle", angle)?;
        ensure_finite("magnitude", magnitude)?;
        Ok(Self::from_direction(angle, magnitude))
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(self) -> f64 {
        self.delta.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(self) -> f64 {
        self.delta.y
    }

    /// Direction in degrees, `[0, 360)`.
    #[must_use]
    pub const fn angle(self) -> f64 {
        self.angle
    }

    /// Length of the vector.
    #[must_use]
    pub const fn magnitude(self) -> f64 {
        self.magnitude
    }

    /// The displacement as a glam vector.
    #[must_use]
    pub const fn as_dvec2(self) -> DVec2 {
        self.delta
    }

    /// Same magnitude, direction turned by `degrees`.
    #[must_use]
    pub fn rotated(self, degrees: f64) -> Self {
        Self::from_direction(self.angle + degrees, self.magnitude)
    }

    fn from_delta(delta: DVec2) -> Self {
        Self {
            delta,
            angle: bearing(delta.y, delta.x),
            magnitude: delta.length(),
        }
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_delta(self.delta + rhs.delta)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self::from_delta(self.delta * factor)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            delta: -self.delta,
            angle: normalise_angle(self.angle + 180.0),
            magnitude: self.magnitude,
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v(dx={:.2} dy={:.2} a={:.2} m={:.2})",
            self.delta.x, self.delta.y, self.angle, self.magnitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::angular_distance;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn from_direction_components() {
        let v = Vector::from_direction(90.0, 2.0);
        assert!(v.dx().abs() < EPS);
        assert!((v.dy() - 2.0).abs() < EPS);
        assert!((v.angle() - 90.0).abs() < EPS);
        assert!((v.magnitude() - 2.0).abs() < EPS);
    }

    #[test]
    fn from_direction_normalises_angle() {
        let v = Vector::from_direction(-45.0, 1.0);
        assert!((v.angle() - 315.0).abs() < EPS);
    }

    #[test]
    fn from_points_without_clamp_keeps_length() {
        let v = Vector::from_points(Point::new(1.0, 1.0), Point::new(4.0, 5.0), None);
        assert!((v.magnitude() - 5.0).abs() < EPS);
        assert!((v.dx() - 3.0).abs() < EPS);
        assert!((v.dy() - 4.0).abs() < EPS);
    }

    #[test]
    fn from_points_degenerate_takes_clamp() {
        let p = Point::new(7.0, 7.0);
        let v = Vector::from_points(p, p, Some(3.0));
        assert!((v.magnitude() - 3.0).abs() < EPS);
        assert!(v.dx().abs() < EPS);
        assert!(v.dy().abs() < EPS);
    }

    #[test]
    fn zero_clamp_keeps_direction() {
        let v = Vector::from_points(Point::new(0.0, 0.0), Point::new(0.0, -10.0), Some(0.0));
        assert!((v.angle() - 270.0).abs() < EPS);
        assert!(v.magnitude().abs() < EPS);
        assert!(v.as_dvec2().length() < EPS);
    }

    #[test]
    fn try_from_points_rejects_bad_input() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(Vector::try_from_points(a, b, Some(2.0)).is_ok());
        assert_eq!(
            Vector::try_from_points(a, b, Some(-1.0)),
            Err(GeometryError::NegativeMagnitude(-1.0))
        );
        assert!(matches!(
            Vector::try_from_points(Point::new(f64::NAN, 0.0), b, None),
            Err(GeometryError::NonFinite { what: "from.x", .. })
        ));
        assert!(matches!(
            Vector::try_from_direction(f64::INFINITY, 1.0),
            Err(GeometryError::NonFinite { what: "angle", .. })
        ));
    }

    #[test]
    fn negation_reverses_direction() {
        let v = Vector::from_direction(30.0, 4.0);
        let n = -v;
        assert!((n.angle() - 210.0).abs() < EPS);
        assert!((n.dx() + v.dx()).abs() < EPS);
        assert!((n.magnitude() - 4.0).abs() < EPS);
    }

    #[test]
    fn scaling_and_addition_rederive_angle() {
        let v = Vector::from_direction(0.0, 2.0) * 3.0;
        assert!((v.magnitude() - 6.0).abs() < EPS);

        let sum = Vector::from_direction(0.0, 1.0) + Vector::from_direction(90.0, 1.0);
        assert!((sum.angle() - 45.0).abs() < EPS);
        assert!((sum.magnitude() - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn rotation_keeps_magnitude() {
        let v = Vector::from_direction(350.0, 5.0).rotated(20.0);
        assert!((v.angle() - 10.0).abs() < EPS);
        assert!((v.magnitude() - 5.0).abs() < EPS);
    }

    proptest! {
        #[test]
        fn prop_clamped_magnitude_and_direction(
            ax in -1000.0f64..1000.0,
            ay in -1000.0f64..1000.0,
            bx in -1000.0f64..1000.0,
            by in -1000.0f64..1000.0,
            m in 0.0f64..500.0,
        ) {
            let a = Point::new(ax, ay);
            let b = Point::new(bx, by);
            prop_assume!(a.distance_to(b) > 1e-6);

            let v = Vector::from_points(a, b, Some(m));
            prop_assert!((v.magnitude() - m).abs() < 1e-9);
            prop_assert!((v.as_dvec2().length() - m).abs() < 1e-6);

            let expected = bearing(b.y() - a.y(), b.x() - a.x());
            prop_assert!(angular_distance(v.angle(), expected) < 1e-9);
        }

        #[test]
        fn prop_from_direction_angle_matches_components(
            angle in -720.0f64..720.0,
            m in 0.1f64..100.0,
        ) {
            let v = Vector::from_direction(angle, m);
            let derived = bearing(v.dy(), v.dx());
            prop_assert!(angular_distance(v.angle(), derived) < 1e-6);
        }
    }
}
