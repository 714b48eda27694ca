//! Positions in geographic coordinates (latitude, longitude and altitude) and the conversion between them
//! and local metric frames (see [`LocalFrame`]).

mod datum;
mod frame;
mod point;

pub use datum::Datum;
pub use frame::LocalFrame;
pub use point::{GeoPoint, GeoPoint3d, GeodesicPoint, NewGeoPoint};
