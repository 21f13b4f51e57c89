//! Angle arithmetic in degrees.

/// Full turn in degrees.
pub const FULL_TURN: f64 = 360.0;

/// Wraps an angle into `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `360.0`; that
/// case folds back to `0.0` so the upper bound stays open.
///
/// # Example
///
/// ```
/// use planar::normalise_angle;
///
/// assert_eq!(normalise_angle(-90.0), 270.0);
/// assert_eq!(normalise_angle(720.0), 0.0);
/// ```
#[must_use]
pub fn normalise_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Direction in degrees of the offset `(dx, dy)`, normalised into `[0, 360)`.
///
/// Unlike `atan(dy / dx)`, both signs are taken into account.
#[must_use]
pub fn bearing(dy: f64, dx: f64) -> f64 {
    normalise_angle(dy.atan2(dx).to_degrees())
}

/// Smallest absolute difference between two angles, in `[0, 180]`.
#[must_use]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalise_angle(a - b);
    diff.min(FULL_TURN - diff)
}
