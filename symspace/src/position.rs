//! Positions a region boundary or a query can be expressed in.

use serde::{Deserialize, Serialize};
use symspace_types::cartesian::{Point2d, Point3d};
use symspace_types::geo::GeoPoint3d;

/// Representation of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionKind {
    /// Metric position in a local frame without elevation.
    Local2d,
    /// Metric position in a local frame.
    Local3d,
    /// Latitude, longitude and altitude.
    Geographic,
}

impl PositionKind {
    /// Name used in the interchange format.
    pub fn name(&self) -> &'static str {
        match self {
            PositionKind::Local2d => "Local2d",
            PositionKind::Local3d => "Local3d",
            PositionKind::Geographic => "Geographic",
        }
    }

    /// Parses the interchange name of the kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Local2d" => Some(PositionKind::Local2d),
            "Local3d" => Some(PositionKind::Local3d),
            "Geographic" => Some(PositionKind::Geographic),
            _ => None,
        }
    }

    /// Returns true for the metric kinds.
    pub fn is_local(&self) -> bool {
        !matches!(self, PositionKind::Geographic)
    }
}

/// Position of a boundary vertex or of a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// Metric position in a local frame without elevation.
    Local2d(Point2d),
    /// Metric position in a local frame.
    Local3d(Point3d),
    /// Latitude, longitude and altitude.
    Geographic(GeoPoint3d),
}

impl Position {
    /// Local position without elevation.
    pub fn local2d(x: f64, y: f64) -> Self {
        Self::Local2d(Point2d::new(x, y))
    }

    /// Local position.
    pub fn local3d(x: f64, y: f64, z: f64) -> Self {
        Self::Local3d(Point3d::new(x, y, z))
    }

    /// Geographic position without altitude.
    pub fn latlon(lat: f64, lon: f64) -> Self {
        Self::Geographic(GeoPoint3d::new(lat, lon, 0.0))
    }

    /// Representation of the position.
    pub fn kind(&self) -> PositionKind {
        match self {
            Position::Local2d(_) => PositionKind::Local2d,
            Position::Local3d(_) => PositionKind::Local3d,
            Position::Geographic(_) => PositionKind::Geographic,
        }
    }

    /// Metric point of a local position (`z` is 0 for 2d positions). Geographic positions return `None`.
    pub fn local_point(&self) -> Option<Point3d> {
        match self {
            Position::Local2d(p) => Some(Point3d::new(p.x, p.y, 0.0)),
            Position::Local3d(p) => Some(*p),
            Position::Geographic(_) => None,
        }
    }

    /// Geographic point of a geographic position.
    pub fn geographic(&self) -> Option<GeoPoint3d> {
        match self {
            Position::Geographic(p) => Some(*p),
            _ => None,
        }
    }

    /// Raw coordinates of the position: `(x, y, z)` for local positions and `(lon, lat, alt)` for geographic
    /// ones.
    pub fn to_vector(&self) -> Point3d {
        match self {
            Position::Geographic(p) => Point3d::from(p.to_lon_lat_alt()),
            _ => self.local_point().unwrap_or_else(Point3d::origin),
        }
    }

    /// Creates a position of the given kind from a local point. Geographic kind is not metric, so the point is
    /// returned as a 3d local position in that case.
    pub fn from_local(point: Point3d, kind: PositionKind) -> Self {
        match kind {
            PositionKind::Local2d => Self::local2d(point.x, point.y),
            _ => Self::Local3d(point),
        }
    }
}

impl From<GeoPoint3d> for Position {
    fn from(value: GeoPoint3d) -> Self {
        Self::Geographic(value)
    }
}

impl From<Point2d> for Position {
    fn from(value: Point2d) -> Self {
        Self::Local2d(value)
    }
}

impl From<Point3d> for Position {
    fn from(value: Point3d) -> Self {
        Self::Local3d(value)
    }
}
