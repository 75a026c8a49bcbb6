//! Angle utilities.
//!
//! All angles are in radians, counter-clockwise positive.

use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Normalize angle to [-π, π).
///
/// # Example
/// ```
/// use marga::core::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-6);
/// assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a >= PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}

/// Signed minimum difference `a - b`, in [-π, π).
///
/// Positive when `a` lies counter-clockwise of `b`.
///
/// # Example
/// ```
/// use marga::core::angle_diff;
/// use std::f32::consts::PI;
///
/// // Crossing the -π/π boundary takes the short way round
/// let diff = angle_diff(-0.9 * PI, 0.9 * PI);
/// assert!((diff - 0.2 * PI).abs() < 1e-5);
/// ```
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(a - b)
}
