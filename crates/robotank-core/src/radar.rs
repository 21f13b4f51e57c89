//! Radar cone visibility.
//!
//! The cone apex sits slightly behind the tank centre so that tanks right next
//! to the hull are still inside the beam. The apex ("back point") is moved
//! back along the course by `sin(half_angle) * radius`.
//!
//! A target is detected when the bearing from the back point to the target
//! falls between the cone's right edge (`course - half`) and left edge
//! (`course + half`). A second test handles cones straddling 0°/360°:
//!
//! ```text
//! right < bearing < left
//!   or (angle > left and right > 360 - angle
//!       and (bearing < left or bearing > right))
//! ```
//!
//! The test is not symmetric: A seeing B says nothing about B seeing A.
//!
//! ```
//! use planar::Point;
//! use robotank_core::radar::RadarCone;
//!
//! let cone = RadarCone::new(40.0, 32.0);
//! let me = Point::new(100.0, 100.0);
//! assert!(cone.sees(me, 0.0, Point::new(200.0, 100.0)));
//! assert!(!cone.sees(me, 0.0, Point::new(0.0, 100.0)));
//! ```

use planar::{bearing, normalise_angle, Point, Vector};

use crate::config::TankTuning;

/// One tank's radar beam geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RadarCone {
    angle: f64,
    half_angle: f64,
    back_distance: f64,
}

impl RadarCone {
    /// A cone of `angle` degrees for a tank of the given radius.
    #[must_use]
    pub fn new(angle: f64, radius: f64) -> Self {
        let half_angle = angle / 2.0;
        Self {
            angle,
            half_angle,
            back_distance: half_angle.to_radians().sin() * radius,
        }
    }

    /// The cone configured for tanks.
    #[must_use]
    pub fn for_tanks(tuning: &TankTuning) -> Self {
        Self::new(tuning.radar_angle, tuning.radius)
    }

    /// Full cone angle in degrees.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Cone apex for an observer at `origin` facing `course`.
    #[must_use]
    pub fn back_point(&self, origin: Point, course: f64) -> Point {
        origin + Vector::from_direction(course + 180.0, self.back_distance)
    }

    /// Left and right edge directions for an observer facing `course`.
    #[must_use]
    pub fn edges(&self, course: f64) -> (f64, f64) {
        (
            normalise_angle(course + self.half_angle),
            normalise_angle(course - self.half_angle),
        )
    }

    /// Whether an observer at `origin` facing `course` sees `target`.
    #[must_use]
    pub fn sees(&self, origin: Point, course: f64, target: Point) -> bool {
        let back = self.back_point(origin, course);
        let direction = bearing(target.y() - back.y(), target.x() - back.x());
        let (left, right) = self.edges(course);

        if right < direction && direction < left {
            return true;
        }
        let straddles_zero = self.angle > left && right > 360.0 - self.angle;
        straddles_zero && (direction < left || direction > right)
    }
}
