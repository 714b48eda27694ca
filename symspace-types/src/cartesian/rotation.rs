//! Rotations about the vertical axis.

use nalgebra::{UnitQuaternion, Vector3};

/// Rotation of `degrees` about the `z` axis.
pub fn yaw(degrees: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(0.0, 0.0, degrees.to_radians())
}

/// Rotation about the `z` axis in degrees.
pub fn yaw_degrees(rotation: &UnitQuaternion<f64>) -> f64 {
    rotation.euler_angles().2.to_degrees()
}

/// Rotates `vector` by `degrees` about the `z` axis.
pub fn rotate_yaw(vector: Vector3<f64>, degrees: f64) -> Vector3<f64> {
    yaw(degrees) * vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn yaw_round_trip() {
        assert_abs_diff_eq!(yaw_degrees(&yaw(-34.04)), -34.04, epsilon = 1e-9);
        assert_abs_diff_eq!(yaw_degrees(&UnitQuaternion::identity()), 0.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let rotated = rotate_yaw(Vector3::new(1.0, 0.0, 0.0), 90.0);
        assert_abs_diff_eq!(rotated, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
