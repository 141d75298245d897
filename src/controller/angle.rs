//! # Stick Angle Module
//!
//! Converts a stick deflection into a compass-style angle.
//!
//! The angle is measured clockwise from "straight forward":
//!
//! | Deflection | Angle |
//! |------------|-------|
//! | Forward (y = 1) | 1° |
//! | Right (x = 1) | 90° |
//! | Backward (y = -1) | 180° |
//! | Left (x = -1) | 270° |
//!
//! Pure axis deflections beyond [`CARDINAL_THRESHOLD`] are snapped to their
//! cardinal angle instead of going through `atan2`. Straight forward snaps to
//! 1° rather than 0° so it stays inside the forward sector on both sides of
//! the wrap-around.
//!
//! ## Usage
//!
//! ```
//! use bittle_bridge::controller::angle::resolve_angle;
//!
//! assert_eq!(resolve_angle(1.0, 0.0), Some(90.0));
//! assert_eq!(resolve_angle(0.1, -0.1), None); // negligible
//! ```

/// Deflection on both axes at or below this value carries no angle.
pub const NEGLIGIBLE_DEFLECTION: f32 = 0.2;

/// Pure axis deflection beyond this value snaps to a cardinal angle.
pub const CARDINAL_THRESHOLD: f32 = 0.9;

/// Angle used for a pure forward deflection.
pub const FORWARD_SNAP_DEG: f32 = 1.0;

fn is_zero(value: f32) -> bool {
    value.abs() < f32::EPSILON
}

/// Resolves a stick deflection into an angle in degrees, range `[0, 360)`.
///
/// # Arguments
///
/// * `x` - Lateral deflection (-1.0 = left, 1.0 = right)
/// * `y` - Forward deflection (-1.0 = backward, 1.0 = forward), already sign-flipped
///
/// # Returns
///
/// `None` when both components are within [`NEGLIGIBLE_DEFLECTION`] of center.
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::angle::resolve_angle;
///
/// assert_eq!(resolve_angle(0.0, 1.0), Some(1.0));
/// assert_eq!(resolve_angle(-1.0, 0.0), Some(270.0));
///
/// let diagonal = resolve_angle(1.0, 1.0).unwrap();
/// assert!((diagonal - 45.0).abs() < 0.001);
/// ```
#[must_use]
pub fn resolve_angle(x: f32, y: f32) -> Option<f32> {
    if x.abs() <= NEGLIGIBLE_DEFLECTION && y.abs() <= NEGLIGIBLE_DEFLECTION {
        return None;
    }

    if is_zero(y) {
        if x > CARDINAL_THRESHOLD {
            return Some(90.0);
        }
        if x < -CARDINAL_THRESHOLD {
            return Some(270.0);
        }
    }
    if is_zero(x) {
        if y > CARDINAL_THRESHOLD {
            return Some(FORWARD_SNAP_DEG);
        }
        if y < -CARDINAL_THRESHOLD {
            return Some(180.0);
        }
    }

    // atan2(x, y): x first so that 0° is forward and angles grow clockwise
    let mut degrees = x.atan2(y).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    Some(degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_angle(x: f32, y: f32, expected: f32) {
        let angle = resolve_angle(x, y).expect("angle should resolve");
        assert!(
            (angle - expected).abs() < 0.01,
            "({}, {}) resolved to {} (expected {})",
            x,
            y,
            angle,
            expected
        );
    }

    #[test]
    fn test_cardinal_snaps() {
        assert_eq!(resolve_angle(1.0, 0.0), Some(90.0));
        assert_eq!(resolve_angle(-1.0, 0.0), Some(270.0));
        assert_eq!(resolve_angle(0.0, 1.0), Some(FORWARD_SNAP_DEG));
        assert_eq!(resolve_angle(0.0, -1.0), Some(180.0));
        assert_eq!(resolve_angle(0.95, 0.0), Some(90.0));
    }

    #[test]
    fn test_diagonals() {
        assert_angle(1.0, 1.0, 45.0);
        assert_angle(1.0, -1.0, 135.0);
        assert_angle(-1.0, -1.0, 225.0);
        assert_angle(-1.0, 1.0, 315.0);
    }

    #[test]
    fn test_pure_axis_below_cardinal_threshold_uses_atan2() {
        assert_angle(0.85, 0.0, 90.0);
        assert_angle(0.0, -0.85, 180.0);
        // atan2 gives exactly 0 for straight forward without the snap
        assert_angle(0.0, 0.85, 0.0);
    }

    #[test]
    fn test_negligible_deflection() {
        assert_eq!(resolve_angle(0.0, 0.0), None);
        assert_eq!(resolve_angle(0.2, -0.2), None);
        assert_eq!(resolve_angle(-0.15, 0.1), None);
    }

    #[test]
    fn test_small_component_still_resolves() {
        assert!(resolve_angle(0.21, 0.0).is_some());
        assert!(resolve_angle(0.0, -0.3).is_some());
    }

    #[test]
    fn test_range_is_half_open() {
        for i in 0..720 {
            let theta = (i as f32 * 0.5).to_radians();
            let angle = resolve_angle(theta.sin(), theta.cos()).unwrap();
            assert!((0.0..360.0).contains(&angle), "angle {} out of range", angle);
        }
    }

    #[test]
    fn test_axis_below_snap_threshold_uses_atan2() {
        // Pure-axis deflections under the snap threshold get their true bearing
        assert!((resolve_angle(0.85, 0.0).unwrap() - 90.0).abs() < 0.001);
        assert!((resolve_angle(-0.85, 0.0).unwrap() - 270.0).abs() < 0.001);
        assert!((resolve_angle(0.0, -0.85).unwrap() - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_left_half_wraps() {
        // Just left of forward: close to 360, never negative
        let angle = resolve_angle(-0.1, 1.0).unwrap();
        assert!(angle > 350.0 && angle < 360.0);
    }
}
