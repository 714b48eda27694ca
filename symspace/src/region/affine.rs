use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use symspace_types::cartesian::rotation;
use symspace_types::cartesian::Point3d;

/// Transform from the local frame of a region into the frame of its parent.
///
/// The rotation of a region is the orientation its boundary was placed with. Rings are already stored in
/// that orientation, so only scale and translation take part in [`AffineTransform::to_parent`]. For a region
/// anchored at a geographic origin the yaw of the rotation is the heading of its local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    rotation: UnitQuaternion<f64>,
    translation: Vector3<f64>,
    scale: Vector3<f64>,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl AffineTransform {
    /// Creates a transform from its components.
    pub fn new(
        rotation: UnitQuaternion<f64>,
        translation: Vector3<f64>,
        scale: Vector3<f64>,
    ) -> Self {
        Self {
            rotation,
            translation,
            scale,
        }
    }

    /// Rotation component.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    /// Translation component.
    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// Scale component.
    pub fn scale(&self) -> Vector3<f64> {
        self.scale
    }

    /// Sets the rotation component.
    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.rotation = rotation;
    }

    /// Sets the rotation to `degrees` about the vertical axis.
    pub fn set_yaw(&mut self, degrees: f64) {
        self.rotation = rotation::yaw(degrees);
    }

    /// Sets the translation component.
    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        self.translation = translation;
    }

    /// Sets the scale component.
    pub fn set_scale(&mut self, scale: Vector3<f64>) {
        self.scale = scale;
    }

    /// Yaw of the rotation in degrees.
    pub fn heading(&self) -> f64 {
        rotation::yaw_degrees(&self.rotation)
    }

    /// Converts a local point into the parent frame.
    pub fn to_parent(&self, point: &Point3d) -> Point3d {
        Point3d::from(point.coords.component_mul(&self.scale) + self.translation)
    }

    /// Converts a point in the parent frame into the local frame.
    pub fn from_parent(&self, point: &Point3d) -> Point3d {
        Point3d::from((point.coords - self.translation).component_div(&self.scale))
    }

    /// Homogeneous matrix of the full transform (`translation * rotation * scale`).
    pub fn matrix(&self) -> Matrix4<f64> {
        self.translation_matrix() * self.rotation.to_homogeneous() * self.scale_matrix()
    }

    /// Homogeneous matrix of the translation component.
    pub fn translation_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation)
    }

    /// Homogeneous matrix of the scale component.
    pub fn scale_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Decomposes a homogeneous `translation * rotation * scale` matrix.
    pub fn from_matrix(matrix: &Matrix4<f64>) -> Self {
        let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        let mut linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let scale = Vector3::new(
            linear.column(0).norm(),
            linear.column(1).norm(),
            linear.column(2).norm(),
        );
        for (i, s) in scale.iter().enumerate() {
            if *s > 0.0 {
                linear.column_mut(i).unscale_mut(*s);
            }
        }

        Self {
            rotation: UnitQuaternion::from_matrix(&linear),
            translation,
            scale,
        }
    }
}
