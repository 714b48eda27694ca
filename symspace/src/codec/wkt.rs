use std::fmt::Write;

use log::debug;
use symspace_types::cartesian::Point3d;
use symspace_types::geo::GeoPoint3d;

use super::RegionCodec;
use crate::boundary::Boundary;
use crate::error::SymspaceError;
use crate::position::{Position, PositionKind};
use crate::region::{Region, RegionKind, RegionLookup};

impl RegionCodec {
    /// Writes the boundary of the region as a `POLYGON Z` WKT string.
    ///
    /// Geographic boundaries are written as `lon lat alt`, local ones as `x y z`. Returns `None` for a region
    /// without a boundary.
    pub fn encode_wkt<L: RegionLookup + ?Sized>(&self, region: &Region, lookup: &L) -> Option<String> {
        let ring = region.coordinates();
        if ring.is_empty() {
            return None;
        }

        let vertices: Vec<[f64; 3]> = match region.bounds_with(lookup) {
            Some(vertices) => vertices.iter().map(GeoPoint3d::to_lon_lat_alt).collect(),
            None => ring.iter_points().map(|p| [p.x, p.y, p.z]).collect(),
        };

        let mut wkt = String::from("POLYGON Z ((");
        for (i, [x, y, z]) in vertices.iter().enumerate() {
            if i > 0 {
                wkt.push_str(", ");
            }
            let _ = write!(wkt, "{x} {y} {z}");
        }
        wkt.push_str("))");

        Some(wkt)
    }

    /// Reads a generic region from a `POLYGON` or `POLYGON Z` WKT string.
    ///
    /// `kind` tells how the coordinates are to be read: for [`PositionKind::Geographic`] as `lon lat alt`,
    /// otherwise as local `x y z`. Interior rings are ignored.
    pub fn decode_wkt(&self, wkt: &str, kind: PositionKind) -> Result<Region, SymspaceError> {
        let points = parse_polygon(wkt)?;
        let positions: Vec<Position> = points
            .into_iter()
            .map(|p| match kind {
                PositionKind::Geographic => Position::Geographic(GeoPoint3d::new(p.y, p.x, p.z)),
                PositionKind::Local2d => Position::local2d(p.x, p.y),
                PositionKind::Local3d => Position::Local3d(p),
            })
            .collect();

        Region::new(RegionKind::Generic).with_bounds(Boundary::ring(positions))
    }
}

fn parse_polygon(wkt: &str) -> Result<Vec<Point3d>, SymspaceError> {
    let text = wkt.trim();
    let Some(rest) = strip_keyword(text, "POLYGON") else {
        return Err(SymspaceError::Decode(format!(
            "expected a WKT polygon, got {text}"
        )));
    };

    let rest = rest.trim_start();
    let (has_z, rest) = match strip_keyword(rest, "Z") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, rest),
    };

    let body = rest
        .strip_prefix('(')
        .and_then(|r| r.trim_end().strip_suffix(')'))
        .map(str::trim)
        .ok_or_else(|| SymspaceError::Decode("unbalanced parentheses in WKT polygon".into()))?;
    let exterior = body
        .strip_prefix('(')
        .ok_or_else(|| SymspaceError::Decode("WKT polygon has no rings".into()))?;
    let end = exterior
        .find(')')
        .ok_or_else(|| SymspaceError::Decode("unterminated WKT ring".into()))?;
    if !exterior[end + 1..].trim().is_empty() {
        debug!("Ignoring interior rings of WKT polygon");
    }

    exterior[..end]
        .split(',')
        .map(|vertex| parse_vertex(vertex, has_z))
        .collect()
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let rest = &text[keyword.len()..];
    match rest.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() => None,
        _ => Some(rest),
    }
}

fn parse_vertex(vertex: &str, has_z: bool) -> Result<Point3d, SymspaceError> {
    let values = vertex
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| SymspaceError::Decode(format!("invalid WKT coordinate {v}")))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    match (values.as_slice(), has_z) {
        ([x, y], false) => Ok(Point3d::new(*x, *y, 0.0)),
        ([x, y, z], _) => Ok(Point3d::new(*x, *y, *z)),
        _ => Err(SymspaceError::Decode(format!(
            "invalid WKT vertex '{}'",
            vertex.trim()
        ))),
    }
}
