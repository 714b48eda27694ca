//! Regions of symbolic space and their hierarchy.

mod affine;
mod frame;
mod hierarchy;
mod kind;

pub use affine::AffineTransform;
pub use hierarchy::{Detached, RegionIndex, RegionLookup};
pub use kind::RegionKind;

use log::debug;
use serde::{Deserialize, Serialize};
use symspace_types::cartesian::{Centroid, Ring};
use symspace_types::geo::Datum;
use uuid::Uuid;

use crate::boundary::{Boundary, BuildOptions};
use crate::error::SymspaceError;
use crate::position::{Position, PositionKind};

/// Floor height used when a floor number is set without an explicit height.
pub const DEFAULT_FLOOR_HEIGHT: f64 = 3.0;

/// Storey information of a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Storey {
    /// Floor number, `0` being the ground floor.
    pub level: i32,
    /// Explicit elevation of the floor above the building origin. When not set it is derived from the level
    /// and the ceiling height.
    pub ground_height: Option<f64>,
}

/// Connection of a region to another region, independent of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Uid of the connected region.
    pub uid: String,
    /// Point where the regions connect.
    pub position: Position,
}

/// Boundary-defined region of space.
///
/// A region keeps its boundary as a closed ring of metric points in its own local frame. Regions with a
/// geographic boundary additionally have a geographic origin which anchors that frame on the datum. Regions
/// with a local boundary are placed into their parent's frame by the [`AffineTransform`].
///
/// ```ignore
/// let mut building = Region::new(RegionKind::Building).with_name("PL9");
/// building.set_bounds(Boundary::rectangle(latlon!(50.82037, 4.39224), 46.275, 37.27, -34.04))?;
///
/// let mut floor = Region::new(RegionKind::Floor);
/// floor.set_building(&building)?;
/// floor.set_floor_number(3, DEFAULT_FLOOR_HEIGHT)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    uid: String,
    display_name: Option<String>,
    kind: RegionKind,
    parent_uid: Option<String>,
    priority: i32,
    boundary_kind: Option<PositionKind>,
    coordinates: Ring,
    origin: Option<Position>,
    transform: AffineTransform,
    centroid: Option<Centroid>,
    connected_spaces: Vec<Connection>,
    storey: Option<Storey>,
    ceiling_height: Option<f64>,
    datum: Datum,
    source: Option<Boundary>,
}

impl Region {
    /// Creates an empty region of the given kind with a random uid.
    pub fn new(kind: RegionKind) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            display_name: None,
            kind,
            parent_uid: None,
            priority: 0,
            boundary_kind: None,
            coordinates: Ring::default(),
            origin: None,
            transform: AffineTransform::default(),
            centroid: None,
            connected_spaces: Vec::new(),
            storey: None,
            ceiling_height: None,
            datum: Datum::default(),
            source: None,
        }
    }

    /// Sets the uid.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the earth model used for geographic boundaries.
    pub fn with_datum(mut self, datum: Datum) -> Self {
        self.datum = datum;
        self
    }

    /// Sets the boundary of the region.
    pub fn with_bounds(mut self, boundary: Boundary) -> Result<Self, SymspaceError> {
        self.set_bounds(boundary)?;
        Ok(self)
    }

    /// Unique id of the region.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Changes the uid of the region.
    pub fn set_uid(&mut self, uid: impl Into<String>) {
        self.uid = uid.into();
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Changes the display name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.display_name = name;
    }

    /// Kind of the region.
    pub fn kind(&self) -> &RegionKind {
        &self.kind
    }

    /// Uid of the parent region.
    pub fn parent_uid(&self) -> Option<&str> {
        self.parent_uid.as_deref()
    }

    /// Sets the parent by uid.
    pub fn set_parent_uid(&mut self, uid: Option<String>) {
        self.parent_uid = uid;
    }

    /// Makes `parent` the parent of this region.
    pub fn set_parent(&mut self, parent: &Region) {
        self.parent_uid = Some(parent.uid.clone());
    }

    /// Priority used to rank containing regions. Higher is more specific.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Changes the priority.
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Representation the boundary was given in. `None` until a boundary is set.
    pub fn boundary_kind(&self) -> Option<PositionKind> {
        self.boundary_kind
    }

    /// Closed boundary ring in the local frame of the region.
    pub fn coordinates(&self) -> &Ring {
        &self.coordinates
    }

    /// Origin of the boundary.
    pub fn origin(&self) -> Option<Position> {
        self.origin
    }

    /// Transform from the local frame of the region into its parent's frame.
    pub fn affine(&self) -> &AffineTransform {
        &self.transform
    }

    /// Replaces the transform of the region.
    pub fn set_affine(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    /// Earth model of the region.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Storey information of a floor.
    pub fn storey(&self) -> Option<Storey> {
        self.storey
    }

    /// Ceiling height used to extrude local boundaries.
    pub fn ceiling_height(&self) -> Option<f64> {
        self.ceiling_height
    }

    /// Assigns the boundary of the region.
    ///
    /// The ring is rebuilt and the centroid recomputed. Local boundaries of regions with a ceiling height are
    /// flattened and extruded up to the ceiling. A rotated rectangle stores its rotation in the transform of
    /// the region.
    pub fn set_bounds(&mut self, boundary: Boundary) -> Result<(), SymspaceError> {
        self.apply_bounds(&boundary)?;
        self.source = Some(boundary);
        Ok(())
    }

    fn apply_bounds(&mut self, boundary: &Boundary) -> Result<(), SymspaceError> {
        let options = BuildOptions {
            datum: self.datum,
            heading: self.transform.heading(),
            extrusion: self.ceiling_height,
        };
        let built = boundary.build(&options)?;

        if let Some(rotation) = built.rotation {
            self.transform.set_yaw(rotation);
        }

        self.coordinates = match built.kind {
            PositionKind::Geographic => Ring::new(
                built
                    .ring
                    .iter_points()
                    .map(|p| self.transform.from_parent(p))
                    .collect(),
            ),
            _ => built.ring,
        };
        self.boundary_kind = Some(built.kind);
        self.origin = built.origin;
        self.update_centroid();

        debug!(
            "Region {} got {} boundary with {} points",
            self.uid,
            built.kind.name(),
            self.coordinates.len()
        );

        Ok(())
    }

    /// Replaces the boundary ring directly.
    ///
    /// `ring` is given in the local frame of the region and may span at most two elevation levels. A
    /// geographic boundary requires a geographic origin.
    pub fn set_ring(
        &mut self,
        kind: PositionKind,
        ring: Ring,
        origin: Option<Position>,
    ) -> Result<(), SymspaceError> {
        if ring.iter_unique().count() < 3 {
            return Err(SymspaceError::MalformedBoundary(format!(
                "ring requires at least 3 distinct points, got {}",
                ring.iter_unique().count()
            )));
        }
        if ring.z_levels().len() > 2 {
            return Err(SymspaceError::MalformedBoundary(
                "boundary vertices span more than two elevation levels".into(),
            ));
        }
        if kind == PositionKind::Geographic && !matches!(origin, Some(Position::Geographic(_))) {
            return Err(SymspaceError::MalformedBoundary(
                "geographic boundary requires a geographic origin".into(),
            ));
        }

        self.boundary_kind = Some(kind);
        self.coordinates = ring;
        self.origin = origin;
        self.source = None;
        self.update_centroid();

        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), SymspaceError> {
        match self.source.take() {
            Some(source) => {
                let result = self.apply_bounds(&source);
                self.source = Some(source);
                result
            }
            None => Ok(()),
        }
    }

    fn update_centroid(&mut self) {
        self.centroid = self.coordinates.centroid();
    }

    /// Centroid of the boundary in the local frame of the region.
    pub fn centroid(&self) -> Option<&Centroid> {
        self.centroid.as_ref()
    }

    /// Largest distance from the centroid to a boundary vertex, in meters.
    pub fn accuracy(&self) -> Option<f64> {
        self.centroid.map(|c| c.accuracy)
    }

    /// Centroid of the region in the representation of its boundary.
    pub fn to_position(&self) -> Option<Position> {
        let point = self.centroid?.point;
        Some(self.present(&[point]).remove(0))
    }

    /// Boundary vertices in the representation the boundary was given in.
    pub fn bounds(&self) -> Vec<Position> {
        self.present(self.coordinates.points())
    }

    /// Returns true if `position` lies within the boundary of the region.
    ///
    /// Positions in a different representation than the boundary are converted with the region's own frame.
    /// Use [`Region::is_inside_with`] when the region gets its geographic anchor from an ancestor.
    pub fn is_inside(&self, position: &Position) -> bool {
        self.is_inside_with(position, &Detached)
    }

    /// Returns true if `position` lies within the boundary of the region, resolving ancestors with `lookup`.
    pub fn is_inside_with<L: RegionLookup + ?Sized>(&self, position: &Position, lookup: &L) -> bool {
        if self.coordinates.is_empty() {
            return false;
        }

        let point = self.to_local_with(position, lookup);
        self.coordinates.contains(&point)
    }

    /// Attaches a floor to a building.
    ///
    /// The floor takes the building's footprint as its boundary, extruded by its ceiling height.
    pub fn set_building(&mut self, building: &Region) -> Result<(), SymspaceError> {
        if self.kind != RegionKind::Floor {
            debug!(
                "Attaching {} region {} to building {}",
                self.kind, self.uid, building.uid
            );
        }

        self.set_parent(building);
        self.priority = building.priority + 1;

        let footprint = building.local_bounds();
        if footprint.len() < 3 {
            debug!("Building {} has no footprint", building.uid);
            return Ok(());
        }

        self.set_bounds(Boundary::ring(footprint))
    }

    /// Sets the floor number and floor height.
    ///
    /// Unless a ground height was set explicitly, the floor is placed at `level * floor_height` above the
    /// building origin. The boundary is extruded by the floor height.
    pub fn set_floor_number(&mut self, level: i32, floor_height: f64) -> Result<(), SymspaceError> {
        let ground_height = self.storey.and_then(|s| s.ground_height);
        self.storey = Some(Storey {
            level,
            ground_height,
        });
        self.ceiling_height = Some(floor_height);
        self.update_elevation();

        self.rebuild()
    }

    /// Sets the elevation of the floor above the building origin.
    pub fn set_ground_height(&mut self, height: f64) {
        let storey = self.storey.get_or_insert(Storey {
            level: 0,
            ground_height: None,
        });
        storey.ground_height = Some(height);
        self.update_elevation();
    }

    /// Elevation of the floor above the building origin.
    pub fn ground_height(&self) -> Option<f64> {
        let storey = self.storey?;
        storey.ground_height.or_else(|| {
            Some(storey.level as f64 * self.ceiling_height.unwrap_or(DEFAULT_FLOOR_HEIGHT))
        })
    }

    /// Sets the ceiling height and re-extrudes the boundary.
    pub fn set_ceiling_height(&mut self, height: f64) -> Result<(), SymspaceError> {
        self.ceiling_height = Some(height);
        self.update_elevation();

        self.rebuild()
    }

    fn update_elevation(&mut self) {
        if let Some(ground_height) = self.ground_height() {
            let mut translation = self.transform.translation();
            translation.z = ground_height;
            self.transform.set_translation(translation);
        }
    }

    /// Attaches a room, corridor, zone or cell space to a floor.
    ///
    /// The region takes over the ceiling height of the floor, so its local boundary spans the full storey.
    pub fn set_floor(&mut self, floor: &Region) -> Result<(), SymspaceError> {
        if !self.kind.is_floor_space() {
            debug!(
                "Attaching {} region {} to floor {}",
                self.kind, self.uid, floor.uid
            );
        }

        self.set_parent(floor);
        self.priority = floor.priority + 1;
        self.ceiling_height = floor.ceiling_height;

        self.rebuild()
    }

    /// Regions this region is connected to.
    pub fn connected_spaces(&self) -> &[Connection] {
        &self.connected_spaces
    }

    /// Connects this region to `other` at `position`. Connecting twice moves the connection point.
    pub fn add_connected_space(&mut self, other: &Region, position: Position) {
        self.add_connection(Connection {
            uid: other.uid.clone(),
            position,
        });
    }

    /// Adds a connection by the uid of the connected region.
    pub fn add_connection(&mut self, connection: Connection) {
        match self
            .connected_spaces
            .iter_mut()
            .find(|c| c.uid == connection.uid)
        {
            Some(existing) => existing.position = connection.position,
            None => self.connected_spaces.push(connection),
        }
    }

    /// Returns true if this region has a connection to `other`.
    pub fn is_connected(&self, other: &Region) -> bool {
        self.connected_spaces.iter().any(|c| c.uid == other.uid)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{} {}", self.kind, self.uid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use symspace_types::cartesian::Point3d;

    fn square() -> Region {
        Region::new(RegionKind::Room)
            .with_bounds(Boundary::corners(
                Position::local2d(5.0, 5.0),
                Position::local2d(10.0, 10.0),
            ))
            .expect("valid boundary")
    }

    #[test]
    fn rectangle_centroid_and_containment() {
        let region = square();

        let centroid = region.centroid().expect("centroid");
        assert_abs_diff_eq!(centroid.point, Point3d::new(7.5, 7.5, 0.0));
        assert_abs_diff_eq!(region.accuracy().expect("accuracy"), 12.5f64.sqrt());

        assert!(region.is_inside(&Position::local2d(7.5, 7.5)));
        assert!(!region.is_inside(&Position::local2d(1.0, 1.0)));
        assert!(!region.is_inside(&Position::local2d(3.0, 2.0)));
        assert_eq!(region.to_position(), Some(Position::local2d(7.5, 7.5)));
    }

    #[test]
    fn box_checks_elevation() {
        let region = Region::new(RegionKind::Room)
            .with_bounds(Boundary::corners(
                Position::local3d(5.0, 5.0, 5.0),
                Position::local3d(10.0, 10.0, 10.0),
            ))
            .expect("valid boundary");

        let centroid = region.centroid().expect("centroid");
        assert_abs_diff_eq!(centroid.point, Point3d::new(7.5, 7.5, 7.5));
        assert!(region.is_inside(&Position::local3d(7.5, 7.5, 7.5)));
        assert!(!region.is_inside(&Position::local3d(7.5, 7.5, 100.0)));
        assert!(!region.is_inside(&Position::local3d(7.5, 7.5, 4.0)));
    }

    #[test]
    fn empty_region_contains_nothing() {
        let region = Region::new(RegionKind::Zone);
        assert!(!region.is_inside(&Position::local2d(0.0, 0.0)));
        assert!(region.centroid().is_none());
        assert!(region.bounds().is_empty());
    }

    #[test]
    fn floor_space_is_extruded_to_ceiling() {
        let mut floor = Region::new(RegionKind::Floor).with_priority(1);
        floor.set_floor_number(2, 4.0).expect("no boundary yet");
        assert_eq!(floor.ground_height(), Some(8.0));
        assert_eq!(floor.affine().translation().z, 8.0);

        let mut room = square();
        room.set_floor(&floor).expect("rebuild");
        assert_eq!(room.parent_uid(), Some(floor.uid()));
        assert_eq!(room.priority(), 2);
        assert_eq!(room.coordinates().z_levels(), vec![0.0, 4.0]);
        assert!(room.is_inside(&Position::local3d(7.5, 7.5, 2.0)));
        assert!(!room.is_inside(&Position::local3d(7.5, 7.5, 5.0)));
    }

    #[test]
    fn explicit_ground_height_is_kept() {
        let mut floor = Region::new(RegionKind::Floor);
        floor.set_ground_height(1.5);
        floor.set_floor_number(3, DEFAULT_FLOOR_HEIGHT).expect("no boundary yet");

        assert_eq!(floor.ground_height(), Some(1.5));
        assert_eq!(floor.affine().translation().z, 1.5);
        assert_eq!(floor.storey().map(|s| s.level), Some(3));
    }

    #[test]
    fn connected_spaces() {
        let mut hallway = Region::new(RegionKind::Hallway);
        let room = square();

        hallway.add_connected_space(&room, Position::local2d(5.0, 7.0));
        hallway.add_connected_space(&room, Position::local2d(5.0, 8.0));

        assert!(hallway.is_connected(&room));
        assert!(!room.is_connected(&hallway));
        assert_eq!(hallway.connected_spaces().len(), 1);
        assert_eq!(
            hallway.connected_spaces()[0].position,
            Position::local2d(5.0, 8.0)
        );
    }

    #[test]
    fn set_ring_validates_origin() {
        let mut region = Region::new(RegionKind::Generic);
        let ring = square().coordinates().clone();

        assert_matches!(
            region.set_ring(PositionKind::Geographic, ring.clone(), None),
            Err(SymspaceError::MalformedBoundary(_))
        );
        assert_matches!(
            region.set_ring(PositionKind::Local2d, Ring::default(), None),
            Err(SymspaceError::MalformedBoundary(_))
        );

        region
            .set_ring(PositionKind::Local2d, ring, None)
            .expect("valid ring");
        assert!(region.is_inside(&Position::local2d(6.0, 6.0)));
    }

    #[test]
    fn set_ring_rejects_sloped_rings() {
        let mut region = Region::new(RegionKind::Generic);
        let sloped = Ring::new(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(0.0, 10.0, 0.5),
            Point3d::new(10.0, 10.0, 1.0),
            Point3d::new(10.0, 0.0, 1.5),
        ]);

        assert_matches!(
            region.set_ring(PositionKind::Local3d, sloped, None),
            Err(SymspaceError::MalformedBoundary(_))
        );
        assert!(region.coordinates().is_empty());
    }

    #[test]
    fn display_uses_name() {
        let region = Region::new(RegionKind::Room).with_uid("r1");
        assert_eq!(region.to_string(), "Room r1");
        assert_eq!(region.with_name("Lab").to_string(), "Lab");
    }
}
