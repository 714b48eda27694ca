use geojson::feature::Id;
use geojson::{Feature, GeoJson, Geometry, JsonObject, JsonValue, Value};
use nalgebra::{Matrix4, Quaternion, UnitQuaternion, Vector3};
use symspace_types::cartesian::{Point3d, Ring, Z_EPSILON};
use symspace_types::geo::{GeoPoint3d, LocalFrame};

use super::RegionCodec;
use crate::error::SymspaceError;
use crate::position::{Position, PositionKind};
use crate::region::{AffineTransform, Connection, Region, RegionLookup, DEFAULT_FLOOR_HEIGHT};

const NAME: &str = "name";
const UID: &str = "uid";
const PARENT_UID: &str = "parent_uid";
const PRIORITY: &str = "priority";
const TYPE: &str = "type";
const BOUNDARY_TYPE: &str = "boundaryType";
const TRANSFORMATION_MATRIX: &str = "transformationMatrix";
const ROTATION_QUATERNION: &str = "rotationQuaternion";
const SCALE_MATRIX: &str = "scaleMatrix";
const TRANSLATION_MATRIX: &str = "translationMatrix";
const FLOOR_LEVEL: &str = "floorLevel";
const GROUND_HEIGHT: &str = "groundHeight";
const CEILING_HEIGHT: &str = "ceilingHeight";
const CONNECTED_SPACES: &str = "connectedSpaces";

impl RegionCodec {
    /// Encodes the region as a GeoJSON feature with a closed polygon ring.
    ///
    /// The ring is written in geographic coordinates (`[lon, lat, alt]`) when the region or one of its
    /// ancestors known to `lookup` has a geographic anchor. Otherwise the local coordinates are written and
    /// the `boundaryType` property names the local representation.
    pub fn encode<L: RegionLookup + ?Sized>(
        &self,
        region: &Region,
        lookup: &L,
    ) -> Result<Feature, SymspaceError> {
        let (kind, ring) = encode_ring(region, lookup, false);
        to_feature(region, kind, ring)
    }

    /// Encodes the region as a GeoJSON feature with 2d positions and without the closing vertex.
    ///
    /// Only the lowest layer of an extruded boundary is written.
    pub fn encode_flat<L: RegionLookup + ?Sized>(
        &self,
        region: &Region,
        lookup: &L,
    ) -> Result<Feature, SymspaceError> {
        let (kind, ring) = encode_ring(region, lookup, true);
        to_feature(region, kind, ring)
    }

    /// Encodes the region as a GeoJSON string.
    pub fn encode_string<L: RegionLookup + ?Sized>(
        &self,
        region: &Region,
        lookup: &L,
    ) -> Result<String, SymspaceError> {
        Ok(self.encode(region, lookup)?.to_string())
    }

    /// Decodes a region from a GeoJSON feature string.
    pub fn decode_str(&self, text: &str) -> Result<Region, SymspaceError> {
        match text.parse::<GeoJson>()? {
            GeoJson::Feature(feature) => self.decode(&feature),
            _ => Err(SymspaceError::Decode("expected a GeoJSON feature".into())),
        }
    }

    /// Decodes a region from a GeoJSON feature.
    ///
    /// The region is created by the registry for the `type` property. Its ring is rebuilt from the polygon
    /// directly; a geographic ring is anchored at its first vertex.
    pub fn decode(&self, feature: &Feature) -> Result<Region, SymspaceError> {
        let mut region = self
            .registry()
            .create(string_property(feature, TYPE)?)?;

        let uid = match (string_property(feature, UID)?, &feature.id) {
            (Some(uid), _) => Some(uid.to_string()),
            (None, Some(Id::String(id))) => Some(id.clone()),
            (None, Some(Id::Number(id))) => Some(id.to_string()),
            (None, None) => None,
        };
        if let Some(uid) = uid {
            region.set_uid(uid);
        }
        region.set_name(string_property(feature, NAME)?.map(str::to_string));
        region.set_parent_uid(string_property(feature, PARENT_UID)?.map(str::to_string));
        if let Some(priority) = integer_property(feature, PRIORITY)? {
            region.set_priority(priority);
        }

        decode_storey(&mut region, feature)?;
        region.set_affine(decode_transform(feature)?);

        if let Some(value) = feature.property(CONNECTED_SPACES) {
            if !value.is_null() {
                let connections: Vec<Connection> = serde_json::from_value(value.clone())
                    .map_err(|err| {
                        SymspaceError::Decode(format!("invalid {CONNECTED_SPACES}: {err}"))
                    })?;
                for connection in connections {
                    region.add_connection(connection);
                }
            }
        }

        let kind = match string_property(feature, BOUNDARY_TYPE)? {
            Some(name) => PositionKind::from_name(name).ok_or_else(|| {
                SymspaceError::Decode(format!("unknown boundary type {name}"))
            })?,
            None => PositionKind::Geographic,
        };

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| SymspaceError::Decode("feature has no geometry".into()))?;
        let Value::Polygon(rings) = &geometry.value else {
            return Err(SymspaceError::Decode("geometry is not a polygon".into()));
        };
        let exterior = rings
            .first()
            .ok_or_else(|| SymspaceError::Decode("polygon has no rings".into()))?;

        decode_ring(&mut region, kind, exterior)?;

        Ok(region)
    }
}

fn encode_ring<L: RegionLookup + ?Sized>(
    region: &Region,
    lookup: &L,
    flat: bool,
) -> (PositionKind, Vec<Vec<f64>>) {
    let ring = region.coordinates();
    let min_z = ring.z_range().map(|(min, _)| min).unwrap_or_default();
    let in_base = |p: &Point3d| !flat || (p.z - min_z).abs() <= Z_EPSILON;

    let (kind, mut positions) = match region.bounds_with(lookup) {
        Some(vertices) => {
            let positions: Vec<Vec<f64>> = ring
                .iter_points()
                .zip(vertices)
                .filter(|(p, _)| in_base(*p))
                .map(|(_, v)| {
                    let [lon, lat, alt] = v.to_lon_lat_alt();
                    if flat {
                        vec![lon, lat]
                    } else {
                        vec![lon, lat, alt]
                    }
                })
                .collect();
            (PositionKind::Geographic, positions)
        }
        None => {
            let kind = match region.boundary_kind() {
                Some(kind) if kind.is_local() => kind,
                _ => PositionKind::Local3d,
            };
            let positions: Vec<Vec<f64>> = ring
                .iter_points()
                .filter(|p| in_base(*p))
                .map(|p| {
                    if flat || kind == PositionKind::Local2d {
                        vec![p.x, p.y]
                    } else {
                        vec![p.x, p.y, p.z]
                    }
                })
                .collect();
            (kind, positions)
        }
    };

    if flat && positions.len() > 1 && positions.first() == positions.last() {
        positions.pop();
    }

    (kind, positions)
}

fn to_feature(
    region: &Region,
    kind: PositionKind,
    ring: Vec<Vec<f64>>,
) -> Result<Feature, SymspaceError> {
    let mut properties = JsonObject::new();
    properties.insert(NAME.into(), region.name().into());
    properties.insert(UID.into(), region.uid().into());
    properties.insert(PARENT_UID.into(), region.parent_uid().into());
    properties.insert(PRIORITY.into(), region.priority().into());
    properties.insert(TYPE.into(), region.kind().tag().into());
    properties.insert(BOUNDARY_TYPE.into(), kind.name().into());

    let transform = region.affine();
    properties.insert(
        TRANSFORMATION_MATRIX.into(),
        matrix_value(&transform.matrix()),
    );
    properties.insert(
        ROTATION_QUATERNION.into(),
        transform
            .rotation()
            .coords
            .iter()
            .copied()
            .collect::<Vec<f64>>()
            .into(),
    );
    properties.insert(SCALE_MATRIX.into(), matrix_value(&transform.scale_matrix()));
    properties.insert(
        TRANSLATION_MATRIX.into(),
        matrix_value(&transform.translation_matrix()),
    );

    if let Some(storey) = region.storey() {
        properties.insert(FLOOR_LEVEL.into(), storey.level.into());
        properties.insert(GROUND_HEIGHT.into(), region.ground_height().into());
    }
    if let Some(height) = region.ceiling_height() {
        properties.insert(CEILING_HEIGHT.into(), height.into());
    }
    if !region.connected_spaces().is_empty() {
        properties.insert(
            CONNECTED_SPACES.into(),
            serde_json::to_value(region.connected_spaces())?,
        );
    }

    let geometry = if ring.is_empty() {
        None
    } else {
        Some(Geometry::new(Value::Polygon(vec![ring])))
    };

    Ok(Feature {
        bbox: None,
        geometry,
        id: Some(Id::String(region.uid().to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

fn matrix_value(matrix: &Matrix4<f64>) -> JsonValue {
    matrix.as_slice().to_vec().into()
}

fn decode_storey(region: &mut Region, feature: &Feature) -> Result<(), SymspaceError> {
    let ceiling_height = number_property(feature, CEILING_HEIGHT)?;
    if let Some(level) = integer_property(feature, FLOOR_LEVEL)? {
        region.set_floor_number(level, ceiling_height.unwrap_or(DEFAULT_FLOOR_HEIGHT))?;
    } else if let Some(height) = ceiling_height {
        region.set_ceiling_height(height)?;
    }

    if let Some(height) = number_property(feature, GROUND_HEIGHT)? {
        region.set_ground_height(height);
    }

    Ok(())
}

fn decode_transform(feature: &Feature) -> Result<AffineTransform, SymspaceError> {
    let rotation = number_array(feature, ROTATION_QUATERNION, 4)?;
    let translation = number_array(feature, TRANSLATION_MATRIX, 16)?;
    let scale = number_array(feature, SCALE_MATRIX, 16)?;

    if rotation.is_none() && translation.is_none() && scale.is_none() {
        return Ok(match number_array(feature, TRANSFORMATION_MATRIX, 16)? {
            Some(matrix) => AffineTransform::from_matrix(&Matrix4::from_column_slice(&matrix)),
            None => AffineTransform::default(),
        });
    }

    let mut transform = AffineTransform::default();
    if let Some(q) = rotation {
        let quaternion = Quaternion::new(q[3], q[0], q[1], q[2]);
        if quaternion.norm() == 0.0 {
            return Err(SymspaceError::Decode(format!(
                "{ROTATION_QUATERNION} must not be zero"
            )));
        }
        transform.set_rotation(UnitQuaternion::from_quaternion(quaternion));
    }
    if let Some(t) = translation {
        transform.set_translation(Vector3::new(t[12], t[13], t[14]));
    }
    if let Some(s) = scale {
        transform.set_scale(Vector3::new(s[0], s[5], s[10]));
    }

    Ok(transform)
}

fn decode_ring(
    region: &mut Region,
    kind: PositionKind,
    positions: &[geojson::Position],
) -> Result<(), SymspaceError> {
    if kind == PositionKind::Geographic {
        let mut vertices = positions
            .iter()
            .map(|p| GeoPoint3d::try_from(p.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        let Some(origin) = vertices.first().copied() else {
            return Err(SymspaceError::Decode("polygon ring is empty".into()));
        };

        let frame = LocalFrame::new(origin, region.affine().heading(), region.datum());
        let points = frame
            .local_ring(&vertices)
            .iter()
            .map(|p| region.affine().from_parent(p))
            .collect();

        return region.set_ring(kind, Ring::new(points), Some(Position::Geographic(origin)));
    }

    let points = positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y] => Ok(Point3d::new(*x, *y, 0.0)),
            [x, y, z, ..] => Ok(Point3d::new(*x, *y, *z)),
            _ => Err(SymspaceError::Decode(format!(
                "position must have at least 2 coordinates, got {}",
                p.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    region.set_ring(kind, Ring::new(points), None)
}

fn string_property<'a>(feature: &'a Feature, key: &str) -> Result<Option<&'a str>, SymspaceError> {
    match feature.property(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(value)) => Ok(Some(value.as_str())),
        Some(other) => Err(SymspaceError::Decode(format!(
            "property {key} must be a string, got {other}"
        ))),
    }
}

fn number_property(feature: &Feature, key: &str) -> Result<Option<f64>, SymspaceError> {
    match feature.property(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            SymspaceError::Decode(format!("property {key} must be a number, got {value}"))
        }),
    }
}

fn integer_property(feature: &Feature, key: &str) -> Result<Option<i32>, SymspaceError> {
    match feature.property(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                SymspaceError::Decode(format!("property {key} must be an integer, got {value}"))
            }),
    }
}

fn number_array(
    feature: &Feature,
    key: &str,
    len: usize,
) -> Result<Option<Vec<f64>>, SymspaceError> {
    let values = match feature.property(key) {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Array(values)) => values,
        Some(other) => {
            return Err(SymspaceError::Decode(format!(
                "property {key} must be an array, got {other}"
            )))
        }
    };

    let numbers = values
        .iter()
        .map(JsonValue::as_f64)
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| SymspaceError::Decode(format!("property {key} must contain numbers")))?;
    if numbers.len() != len {
        return Err(SymspaceError::Decode(format!(
            "property {key} must have {len} values, got {}",
            numbers.len()
        )));
    }

    Ok(Some(numbers))
}
