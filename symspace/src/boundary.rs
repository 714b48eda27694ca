//! Boundary descriptors and their conversion into closed rings.

use crate::error::SymspaceError;
use crate::position::{Position, PositionKind};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use symspace_types::cartesian::rotation::rotate_yaw;
use symspace_types::cartesian::{Point3d, Ring, Z_EPSILON};
use symspace_types::geo::{Datum, GeoPoint, GeoPoint3d, LocalFrame};

/// Declarative description of a region boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Boundary {
    /// Explicit sequence of at least 3 vertices. The ring is closed automatically.
    Ring(Vec<Position>),
    /// Axis-aligned rectangle given by two opposite corners. If the corners have different elevation, a
    /// rectangular prism is created.
    Corners {
        /// First corner.
        top_left: Position,
        /// Opposite corner.
        bottom_right: Position,
    },
    /// Rectangle with one corner, the lengths of its sides and a rotation about the vertical axis.
    Rectangle {
        /// Corner the sides start from.
        top_left: Position,
        /// Length of the first side in meters.
        width: f64,
        /// Length of the second side in meters.
        length: f64,
        /// Rotation in degrees. For geographic corners this is the bearing of the first side (clockwise from
        /// north).
        rotation: f64,
        /// Optional extrusion height in meters.
        height: Option<f64>,
    },
}

/// Parameters of the region the boundary is built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Earth model for geographic boundaries.
    pub datum: Datum,
    /// Heading of the region frame in degrees, used for geographic rings.
    pub heading: f64,
    /// Height to extrude local boundaries by. Local vertices are flattened to `z = 0` first.
    pub extrusion: Option<f64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            datum: Datum::WGS84,
            heading: 0.0,
            extrusion: None,
        }
    }
}

/// Result of building a [`Boundary`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltBoundary {
    /// Representation of the input vertices.
    pub kind: PositionKind,
    /// Closed ring in the metric frame of the region.
    pub ring: Ring,
    /// Position of local `(0, 0, 0)`: geographic anchor for geographic boundaries, local corner for
    /// rectangles.
    pub origin: Option<Position>,
    /// Rotation of a rotated rectangle in degrees.
    pub rotation: Option<f64>,
}

impl Boundary {
    /// Explicit ring boundary.
    pub fn ring(points: impl IntoIterator<Item = impl Into<Position>>) -> Self {
        Self::Ring(points.into_iter().map(Into::into).collect())
    }

    /// Corner pair boundary.
    pub fn corners(top_left: impl Into<Position>, bottom_right: impl Into<Position>) -> Self {
        Self::Corners {
            top_left: top_left.into(),
            bottom_right: bottom_right.into(),
        }
    }

    /// Rotated rectangle boundary without extrusion.
    pub fn rectangle(top_left: impl Into<Position>, width: f64, length: f64, rotation: f64) -> Self {
        Self::Rectangle {
            top_left: top_left.into(),
            width,
            length,
            rotation,
            height: None,
        }
    }

    /// Sets the extrusion height of a rectangle boundary. Other boundaries are returned unchanged.
    pub fn with_height(self, new_height: f64) -> Self {
        match self {
            Self::Rectangle {
                top_left,
                width,
                length,
                rotation,
                ..
            } => Self::Rectangle {
                top_left,
                width,
                length,
                rotation,
                height: Some(new_height),
            },
            other => other,
        }
    }

    /// Builds the closed ring described by the boundary.
    pub fn build(&self, options: &BuildOptions) -> Result<BuiltBoundary, SymspaceError> {
        let built = match self {
            Boundary::Ring(points) => build_ring(points, options)?,
            Boundary::Corners {
                top_left,
                bottom_right,
            } => build_corners(top_left, bottom_right, options)?,
            Boundary::Rectangle {
                top_left,
                width,
                length,
                rotation,
                height,
            } => build_rectangle(top_left, *width, *length, *rotation, *height, options)?,
        };

        if built.ring.z_levels().len() > 2 {
            return Err(SymspaceError::MalformedBoundary(
                "boundary vertices span more than two elevation levels".into(),
            ));
        }

        Ok(built)
    }
}

fn build_ring(points: &[Position], options: &BuildOptions) -> Result<BuiltBoundary, SymspaceError> {
    let kind = common_kind(points)?;
    let distinct = points
        .iter()
        .enumerate()
        .filter(|(i, p)| points.iter().position(|other| other == *p) == Some(*i))
        .count();
    if distinct < 3 {
        return Err(SymspaceError::MalformedBoundary(format!(
            "ring requires at least 3 distinct points, got {distinct}"
        )));
    }

    if kind == PositionKind::Geographic {
        let mut vertices: Vec<GeoPoint3d> = points.iter().filter_map(|p| p.geographic()).collect();
        if vertices.first() == vertices.last() {
            vertices.pop();
        }
        return Ok(geographic_ring(vertices, options.heading, options, None));
    }

    let vertices: Vec<Point3d> = points.iter().filter_map(|p| p.local_point()).collect();
    Ok(local_ring(vertices, kind, options.extrusion, None, None))
}

fn build_corners(
    top_left: &Position,
    bottom_right: &Position,
    options: &BuildOptions,
) -> Result<BuiltBoundary, SymspaceError> {
    let kind = common_kind(&[*top_left, *bottom_right])?;

    if let (Some(tl), Some(br)) = (top_left.geographic(), bottom_right.geographic()) {
        if tl.lat() == br.lat() || tl.lon() == br.lon() {
            return Err(SymspaceError::MalformedBoundary(
                "corners do not span a rectangle".into(),
            ));
        }

        let mut vertices = vec![
            tl,
            GeoPoint3d::new(br.lat(), tl.lon(), tl.alt()),
            br.with_alt(tl.alt()),
            GeoPoint3d::new(tl.lat(), br.lon(), tl.alt()),
        ];
        if tl.alt() != br.alt() {
            let top: Vec<GeoPoint3d> = vertices.iter().map(|v| v.with_alt(br.alt())).collect();
            vertices.extend(top);
        }

        return Ok(geographic_ring(vertices, options.heading, options, None));
    }

    let (Some(mut tl), Some(mut br)) = (top_left.local_point(), bottom_right.local_point()) else {
        return Err(SymspaceError::MalformedBoundary(
            "corners must share one representation".into(),
        ));
    };

    if let Some(height) = positive(options.extrusion) {
        tl.z = 0.0;
        br.z = height;
    }

    let diff = br - tl;
    if diff.x == 0.0 || diff.y == 0.0 {
        return Err(SymspaceError::MalformedBoundary(
            "corners do not span a rectangle".into(),
        ));
    }

    let origin = tl + Vector3::new(diff.x, 0.0, 0.0);
    let mut vertices = vec![
        tl,
        tl + Vector3::new(0.0, diff.y, 0.0),
        Point3d::new(br.x, br.y, tl.z),
        origin,
    ];
    let kind = if diff.z != 0.0 {
        vertices.extend(
            vertices
                .clone()
                .into_iter()
                .map(|v| v + Vector3::new(0.0, 0.0, diff.z)),
        );
        PositionKind::Local3d
    } else {
        kind
    };

    Ok(local_ring(
        vertices,
        kind,
        None,
        Some(Position::from_local(origin, kind)),
        None,
    ))
}

fn build_rectangle(
    top_left: &Position,
    width: f64,
    length: f64,
    rotation: f64,
    height: Option<f64>,
    options: &BuildOptions,
) -> Result<BuiltBoundary, SymspaceError> {
    for (name, value) in [("width", width), ("length", length)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(SymspaceError::MalformedBoundary(format!(
                "rectangle {name} must be a positive number, got {value}"
            )));
        }
    }
    if !rotation.is_finite() {
        return Err(SymspaceError::MalformedBoundary(
            "rectangle rotation must be finite".into(),
        ));
    }
    if let Some(height) = height {
        if !height.is_finite() || height < 0.0 {
            return Err(SymspaceError::MalformedBoundary(format!(
                "extrusion height must be a non-negative number, got {height}"
            )));
        }
    }

    if let Position::Geographic(tl) = top_left {
        let datum = &options.datum;
        let top_right = tl.offset(rotation, width, datum);
        let bottom_left = tl.offset(rotation + 90.0, length, datum);
        let bottom_right = top_right.offset(rotation + 90.0, length, datum);

        let mut vertices = vec![bottom_left, *tl, top_right, bottom_right];
        if let Some(height) = positive(height) {
            let top: Vec<GeoPoint3d> = vertices
                .iter()
                .map(|v| v.with_alt(v.alt() + height))
                .collect();
            vertices.extend(top);
        }

        return Ok(geographic_ring(vertices, rotation, options, Some(rotation)));
    }

    let Some(mut tl) = top_left.local_point() else {
        return Err(SymspaceError::MalformedBoundary(
            "unsupported rectangle corner".into(),
        ));
    };
    let extrusion = positive(height).or(positive(options.extrusion));
    if extrusion.is_some() {
        tl.z = 0.0;
    }

    let top_right = tl + rotate_yaw(Vector3::new(width, 0.0, 0.0), rotation);
    let bottom_left = tl + rotate_yaw(Vector3::new(0.0, length, 0.0), rotation);
    let bottom_right = tl + rotate_yaw(Vector3::new(width, length, 0.0), rotation);

    let kind = if extrusion.is_some() {
        PositionKind::Local3d
    } else {
        top_left.kind()
    };

    Ok(local_ring(
        vec![tl, top_right, bottom_right, bottom_left],
        kind,
        extrusion,
        Some(Position::from_local(bottom_left, kind)),
        Some(rotation),
    ))
}

fn geographic_ring(
    vertices: Vec<GeoPoint3d>,
    heading: f64,
    options: &BuildOptions,
    rotation: Option<f64>,
) -> BuiltBoundary {
    let origin = vertices[0];
    let frame = LocalFrame::new(origin, heading, options.datum);

    BuiltBoundary {
        kind: PositionKind::Geographic,
        ring: Ring::new(frame.local_ring(&vertices)),
        origin: Some(Position::Geographic(origin)),
        rotation,
    }
}

fn local_ring(
    mut vertices: Vec<Point3d>,
    kind: PositionKind,
    extrusion: Option<f64>,
    origin: Option<Position>,
    rotation: Option<f64>,
) -> BuiltBoundary {
    let kind = match positive(extrusion) {
        Some(height) => {
            vertices = lowest_layer(vertices);
            for v in &mut vertices {
                v.z = 0.0;
            }
            let top: Vec<Point3d> = vertices
                .iter()
                .map(|v| Point3d::new(v.x, v.y, height))
                .collect();
            vertices.extend(top);
            PositionKind::Local3d
        }
        None => kind,
    };

    BuiltBoundary {
        kind,
        ring: Ring::new(vertices),
        origin,
        rotation,
    }
}

/// Keeps the vertices on the lowest elevation level of a flat ring or a prism.
fn lowest_layer(mut vertices: Vec<Point3d>) -> Vec<Point3d> {
    let min_z = vertices.iter().map(|v| v.z).fold(f64::INFINITY, f64::min);
    vertices.retain(|v| v.z - min_z <= Z_EPSILON);
    vertices.dedup();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    vertices
}

fn common_kind(points: &[Position]) -> Result<PositionKind, SymspaceError> {
    let Some(first) = points.first() else {
        return Err(SymspaceError::MalformedBoundary("boundary is empty".into()));
    };

    let is_geographic = first.kind() == PositionKind::Geographic;
    if points
        .iter()
        .any(|p| (p.kind() == PositionKind::Geographic) != is_geographic)
    {
        return Err(SymspaceError::MalformedBoundary(
            "boundary mixes geographic and local positions".into(),
        ));
    }

    if is_geographic {
        Ok(PositionKind::Geographic)
    } else if points.iter().any(|p| p.kind() == PositionKind::Local3d) {
        Ok(PositionKind::Local3d)
    } else {
        Ok(PositionKind::Local2d)
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
