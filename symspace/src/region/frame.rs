use ahash::{HashSet, HashSetExt};
use log::{debug, warn};
use symspace_types::cartesian::Point3d;
use symspace_types::geo::{GeoPoint3d, LocalFrame};

use super::{Region, RegionLookup};
use crate::position::{Position, PositionKind};

impl Region {
    /// Local frame anchored at the geographic origin of the region.
    ///
    /// Only regions with a geographic boundary have a frame. The heading of the frame is the yaw of the
    /// region's rotation.
    pub fn frame(&self) -> Option<LocalFrame> {
        match (self.boundary_kind, self.origin) {
            (Some(PositionKind::Geographic), Some(Position::Geographic(origin))) => Some(
                LocalFrame::new(origin, self.transform.heading(), self.datum),
            ),
            _ => None,
        }
    }

    pub(super) fn present(&self, points: &[Point3d]) -> Vec<Position> {
        let frame = self.frame();
        let kind = self.boundary_kind.unwrap_or(PositionKind::Local3d);

        points
            .iter()
            .map(|p| match &frame {
                Some(frame) => {
                    Position::Geographic(frame.to_geographic(&self.transform.to_parent(p)))
                }
                None => Position::from_local(*p, kind),
            })
            .collect()
    }

    /// Converts a position between the local frame of the region and geographic coordinates.
    ///
    /// Local positions are converted into geographic ones and the other way around. Regions without a
    /// geographic anchor cannot convert positions, so the position is returned unchanged.
    pub fn transform(&self, position: &Position) -> Position {
        let Some(frame) = self.frame() else {
            debug!(
                "Region {} has no geographic anchor, position is not transformed",
                self.uid
            );
            return *position;
        };

        match position {
            Position::Geographic(point) => {
                Position::Local3d(self.transform.from_parent(&frame.to_local(point)))
            }
            local => Position::Geographic(
                frame.to_geographic(&self.transform.to_parent(&local.to_vector())),
            ),
        }
    }

    /// This region followed by its ancestors up to the first one with a geographic anchor.
    ///
    /// The walk stops at a parent unknown to `lookup` or when the hierarchy loops.
    pub fn ancestry<'a, L: RegionLookup + ?Sized>(&'a self, lookup: &'a L) -> Vec<&'a Region> {
        let mut chain = vec![self];
        let mut visited = HashSet::new();
        visited.insert(self.uid.as_str());

        let mut current = self;
        while current.frame().is_none() {
            let Some(parent_uid) = current.parent_uid.as_deref() else {
                break;
            };
            if !visited.insert(parent_uid) {
                warn!(
                    "Region hierarchy contains a cycle through {parent_uid}, stopping at {}",
                    current.uid
                );
                break;
            }
            let Some(parent) = lookup.region(parent_uid) else {
                debug!("Parent {parent_uid} of region {} is not known", current.uid);
                break;
            };

            chain.push(parent);
            current = parent;
        }

        chain
    }

    /// Converts a point in the local frame of the region into geographic coordinates through its ancestors.
    ///
    /// Returns `None` if no region in the chain has a geographic anchor.
    pub fn to_geographic_with<L: RegionLookup + ?Sized>(
        &self,
        point: &Point3d,
        lookup: &L,
    ) -> Option<GeoPoint3d> {
        let chain = self.ancestry(lookup);
        let frame = chain.last()?.frame()?;
        let local = chain
            .iter()
            .fold(*point, |p, region| region.transform.to_parent(&p));

        Some(frame.to_geographic(&local))
    }

    /// Converts a position into the local frame of the region through its ancestors.
    ///
    /// Local positions are taken to be in the frame of the region already. When no region in the chain has
    /// a geographic anchor, the raw coordinates of a geographic position are used.
    pub fn to_local_with<L: RegionLookup + ?Sized>(
        &self,
        position: &Position,
        lookup: &L,
    ) -> Point3d {
        let Position::Geographic(point) = position else {
            return position.to_vector();
        };

        let chain = self.ancestry(lookup);
        match chain.last().and_then(|region| region.frame()) {
            Some(frame) => chain
                .iter()
                .rev()
                .fold(frame.to_local(point), |p, region| {
                    region.transform.from_parent(&p)
                }),
            None => {
                debug!(
                    "Region {} has no geographic anchor, using raw coordinates of {position:?}",
                    self.uid
                );
                position.to_vector()
            }
        }
    }

    /// Boundary vertices in geographic coordinates, resolving the anchor through ancestors.
    pub fn bounds_with<L: RegionLookup + ?Sized>(&self, lookup: &L) -> Option<Vec<GeoPoint3d>> {
        self.coordinates
            .iter_points()
            .map(|p| self.to_geographic_with(p, lookup))
            .collect()
    }

    /// Open boundary ring in metric coordinates.
    ///
    /// For geographic boundaries the vertices are walked one after another on the datum, starting at the
    /// first vertex. Local boundaries are returned as they are stored.
    pub fn local_bounds(&self) -> Vec<Position> {
        let mut points = match self.frame() {
            Some(frame) => {
                let mut vertices: Vec<GeoPoint3d> = self
                    .bounds()
                    .iter()
                    .filter_map(Position::geographic)
                    .collect();
                vertices.pop();
                frame.local_ring(&vertices)
            }
            None => {
                let mut points = self.coordinates.points().to_vec();
                points.pop();
                points
            }
        };

        if points.len() == 1 {
            points.clear();
        }

        let kind = match self.boundary_kind {
            Some(PositionKind::Local3d) => PositionKind::Local3d,
            Some(PositionKind::Geographic) if self.coordinates.z_levels().len() > 1 => {
                PositionKind::Local3d
            }
            _ => PositionKind::Local2d,
        };

        points
            .into_iter()
            .map(|p| Position::from_local(p, kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use symspace_types::latlon;

    use super::*;
    use crate::boundary::Boundary;
    use crate::region::{Detached, RegionIndex, RegionKind};
    use crate::tests::{building, init_logger, BUILDING_LENGTH, BUILDING_WIDTH};

    #[test]
    fn building_local_bounds_recover_size() {
        init_logger();
        let building = building();

        let bounds: Vec<Point3d> = building
            .local_bounds()
            .iter()
            .filter_map(Position::local_point)
            .collect();
        assert_eq!(bounds.len(), 4);

        let width = (bounds[2] - bounds[1]).norm();
        let length = (bounds[1] - bounds[0]).norm();
        assert_abs_diff_eq!(width, BUILDING_WIDTH, epsilon = 1e-3);
        assert_abs_diff_eq!(length, BUILDING_LENGTH, epsilon = 1e-3);
    }

    #[test]
    fn transform_round_trip() {
        let building = building();

        let local = Position::local3d(10.0, 20.0, 3.0);
        let geographic = building.transform(&local);
        assert!(geographic.geographic().is_some());

        let back = building
            .transform(&geographic)
            .local_point()
            .expect("local position");
        assert_abs_diff_eq!(back, Point3d::new(10.0, 20.0, 3.0), epsilon = 1e-3);
    }

    #[test]
    fn unanchored_transform_is_identity() {
        let region = Region::new(RegionKind::Room)
            .with_bounds(Boundary::corners(
                Position::local2d(0.0, 0.0),
                Position::local2d(1.0, 1.0),
            ))
            .expect("valid boundary");

        let position = Position::latlon(50.0, 4.0);
        assert_eq!(region.transform(&position), position);
        assert!(region.to_geographic_with(&Point3d::origin(), &Detached).is_none());
    }

    #[test]
    fn hierarchy_conversion() {
        let building = building();
        let mut floor = Region::new(RegionKind::Floor);
        floor.set_building(&building).expect("footprint");
        floor.set_floor_number(3, 3.0).expect("rebuild");

        let universe = [building.clone(), floor.clone()];
        let index = RegionIndex::new(&universe);

        let chain = floor.ancestry(&index);
        assert_eq!(chain.len(), 2);

        let geographic = floor
            .to_geographic_with(&Point3d::new(5.0, 5.0, 1.0), &index)
            .expect("anchored through building");
        assert_abs_diff_eq!(geographic.alt(), 10.0, epsilon = 1e-9);

        let local = floor.to_local_with(&Position::Geographic(geographic), &index);
        assert_abs_diff_eq!(local, Point3d::new(5.0, 5.0, 1.0), epsilon = 1e-3);

        assert!(floor.is_inside_with(&Position::Geographic(geographic), &index));
        assert!(!floor.is_inside_with(&Position::Geographic(geographic.with_alt(20.0)), &index));
    }

    #[test]
    fn floor_of_extruded_building() {
        let building = Region::new(RegionKind::Building)
            .with_bounds(
                Boundary::rectangle(
                    latlon!(50.8203726927966, 4.392241309019189),
                    BUILDING_WIDTH,
                    BUILDING_LENGTH,
                    -34.04,
                )
                .with_height(20.0),
            )
            .expect("valid boundary");
        let mut floor = Region::new(RegionKind::Floor);
        floor.set_building(&building).expect("footprint");
        floor.set_floor_number(1, 3.0).expect("rebuild");

        assert_eq!(floor.coordinates().z_levels(), vec![0.0, 3.0]);
        assert_eq!(floor.coordinates().len(), 9);
        assert!(floor.is_inside(&Position::local3d(20.0, 20.0, 1.0)));
        assert!(!floor.is_inside(&Position::local3d(20.0, 20.0, 5.0)));

        let universe = [building.clone(), floor.clone()];
        let index = RegionIndex::new(&universe);
        let geographic = floor
            .to_geographic_with(&Point3d::new(20.0, 20.0, 1.0), &index)
            .expect("anchored through building");
        assert_abs_diff_eq!(geographic.alt(), 4.0, epsilon = 1e-9);
        assert!(floor.is_inside_with(&Position::Geographic(geographic), &index));
        assert!(building.is_inside(&Position::Geographic(geographic)));

        let mut room = Region::new(RegionKind::Room)
            .with_bounds(Boundary::ring([
                Position::local3d(0.0, 0.0, 0.0),
                Position::local3d(0.0, 10.0, 0.0),
                Position::local3d(10.0, 10.0, 0.0),
                Position::local3d(10.0, 0.0, 0.0),
                Position::local3d(0.0, 0.0, 20.0),
                Position::local3d(0.0, 10.0, 20.0),
                Position::local3d(10.0, 10.0, 20.0),
                Position::local3d(10.0, 0.0, 20.0),
            ]))
            .expect("valid boundary");
        room.set_floor(&floor).expect("rebuild");
        assert_eq!(room.coordinates().z_levels(), vec![0.0, 3.0]);
        assert!(room.is_inside(&Position::local3d(5.0, 5.0, 1.0)));
    }

    #[test]
    fn cycle_stops_walk() {
        let mut a = Region::new(RegionKind::Zone).with_uid("a");
        let mut b = Region::new(RegionKind::Zone).with_uid("b");
        a.set_parent(&b);
        b.set_parent(&a);

        let universe = vec![a.clone(), b];
        assert_eq!(a.ancestry(&universe).len(), 2);

        let position = Position::Geographic(latlon!(50.0, 4.0));
        assert_eq!(
            a.to_local_with(&position, &universe),
            position.to_vector()
        );
    }
}
