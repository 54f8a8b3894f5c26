//! Attitude error helpers
//!
//! Quaternion utilities for the attitude control law: shortest-arc axis-angle
//! error between two orientations, degree wrapping, and pitch/yaw/roll
//! composition for the world frame used throughout the crate (Y up, Z
//! forward, X right; pitch about X, yaw about Y, roll about Z).

use nalgebra::{UnitQuaternion, Vector3};

/// Wrap an angle in degrees into `[-180, 180]`
pub fn wrap_angle_deg(angle: f32) -> f32 {
    let mut wrapped = angle;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    if wrapped < -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Rotational error between target and current orientation
///
/// Expressed as `axis * wrapped_angle_deg`: the shortest-arc rotation that
/// carries `current` onto `target`, in world frame. Identity delta yields the
/// zero vector, so a zero-magnitude error produces a zero correction
/// downstream.
pub fn attitude_error_deg(
    target: &UnitQuaternion<f32>,
    current: &UnitQuaternion<f32>,
) -> Vector3<f32> {
    let delta = target * current.inverse();
    match delta.axis_angle() {
        Some((axis, angle)) => axis.into_inner() * wrap_angle_deg(angle.to_degrees()),
        None => Vector3::zeros(),
    }
}

/// Compose a rotation from pitch/yaw/roll in degrees
///
/// Applied yaw-first (`Ry * Rx * Rz`), matching the target-attitude
/// composition used by the flight modes.
pub fn from_pitch_yaw_roll_deg(pitch: f32, yaw: f32, roll: f32) -> UnitQuaternion<f32> {
    let yaw_q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw.to_radians());
    let pitch_q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch.to_radians());
    let roll_q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll.to_radians());
    yaw_q * pitch_q * roll_q
}

/// Heading of a rotation about the world up axis, in degrees
///
/// Extracted from the rotated forward vector projected on the ground plane.
pub fn yaw_deg(q: &UnitQuaternion<f32>) -> f32 {
    let forward = q * Vector3::z();
    forward.x.atan2(forward.z).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    // ========== Angle Wrap Tests ==========

    #[test]
    fn test_wrap_large_positive_angle() {
        assert!((wrap_angle_deg(200.0) - (-160.0)).abs() < EPS);
    }

    #[test]
    fn test_wrap_large_negative_angle() {
        assert!((wrap_angle_deg(-200.0) - 160.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_leaves_small_angles_untouched() {
        assert!((wrap_angle_deg(45.0) - 45.0).abs() < EPS);
        assert!((wrap_angle_deg(-45.0) + 45.0).abs() < EPS);
        assert!((wrap_angle_deg(180.0) - 180.0).abs() < EPS);
        assert!((wrap_angle_deg(0.0)).abs() < EPS);
    }

    // ========== Attitude Error Tests ==========

    #[test]
    fn test_identical_orientations_zero_error() {
        let q = from_pitch_yaw_roll_deg(10.0, 20.0, 30.0);
        let error = attitude_error_deg(&q, &q);
        assert!(error.norm() < EPS);
    }

    #[test]
    fn test_yaw_error_magnitude_and_axis() {
        let current = UnitQuaternion::identity();
        let target = from_pitch_yaw_roll_deg(0.0, 90.0, 0.0);

        let error = attitude_error_deg(&target, &current);
        assert!((error.norm() - 90.0).abs() < 0.1);
        // Rotation about +Y.
        assert!((error.y - 90.0).abs() < 0.1, "error {:?}", error);
    }

    #[test]
    fn test_error_takes_shortest_arc() {
        let current = UnitQuaternion::identity();
        let target = from_pitch_yaw_roll_deg(0.0, 270.0, 0.0);

        // 270° one way is 90° the other; the error must not exceed 180°.
        let error = attitude_error_deg(&target, &current);
        assert!(
            (error.norm() - 90.0).abs() < 0.1,
            "expected 90° shortest arc, got {}",
            error.norm()
        );
        assert!(error.y < 0.0, "arc should run negative about Y: {:?}", error);
    }

    #[test]
    fn test_error_is_antisymmetric() {
        let a = from_pitch_yaw_roll_deg(5.0, 30.0, 0.0);
        let b = from_pitch_yaw_roll_deg(-10.0, -20.0, 15.0);

        let forward = attitude_error_deg(&a, &b);
        let backward = attitude_error_deg(&b, &a);
        assert!((forward + backward).norm() < 0.1);
    }

    // ========== Euler Composition Tests ==========

    #[test]
    fn test_yaw_extraction_round_trip() {
        for deg in [-150.0f32, -90.0, -30.0, 0.0, 30.0, 90.0, 150.0] {
            let q = from_pitch_yaw_roll_deg(0.0, deg, 0.0);
            assert!(
                (yaw_deg(&q) - deg).abs() < 0.1,
                "yaw round trip failed at {}°",
                deg
            );
        }
    }

    #[test]
    fn test_yaw_extraction_survives_pitch_and_roll() {
        let q = from_pitch_yaw_roll_deg(10.0, 45.0, -5.0);
        assert!((yaw_deg(&q) - 45.0).abs() < 1.0);
    }
}
