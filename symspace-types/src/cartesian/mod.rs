//! Metric geometries in a local frame.

mod ring;
pub mod rotation;

pub use nalgebra::{Point2, Point3, Vector3};
pub use ring::{Centroid, Ring, Z_EPSILON};

/// 2d metric point.
pub type Point2d = Point2<f64>;
/// 3d metric point.
pub type Point3d = Point3<f64>;
