//! Geometric primitives used by `symspace`.
//!
//! * [`geo`] contains points on the surface of the earth ([`geo::GeoPoint3d`]), the earth model
//!   ([`geo::Datum`]) and [`geo::LocalFrame`], which maps between geographic coordinates and a metric frame
//!   anchored at a geographic origin.
//! * [`cartesian`] contains metric points, rotation helpers and the closed [`cartesian::Ring`] used as
//!   a region boundary.

pub mod cartesian;
pub mod error;
pub mod geo;

pub use cartesian::{Point2d, Point3d, Ring};
pub use geo::{Datum, GeoPoint, GeoPoint3d, LocalFrame, NewGeoPoint};
