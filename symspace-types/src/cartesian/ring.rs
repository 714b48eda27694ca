use crate::cartesian::{Point2d, Point3d};
use serde::{Deserialize, Serialize};

/// Elevation values closer than this are considered to be on the same level.
pub const Z_EPSILON: f64 = 1e-6;

/// Closed sequence of 3d points describing a polygon boundary.
///
/// Unlike an open contour, the last point of a non-empty ring is always equal to the first one. A ring can
/// describe a flat polygon (all points on one elevation level) or a prism: a bottom ring followed by a top
/// ring with the same cross-section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    points: Vec<Point3d>,
}

/// Center of a ring with the largest distance from the center to the ring vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Arithmetic mean of the distinct vertices.
    pub point: Point3d,
    /// Largest distance from `point` to a vertex of the ring, in meters.
    pub accuracy: f64,
}

impl Ring {
    /// Creates a new ring, appending the first point if the sequence is not closed.
    pub fn new(mut points: Vec<Point3d>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last || points.len() == 1 {
                points.push(first);
            }
        }

        Self { points }
    }

    /// Points of the ring including the closing point.
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// Iterates over the points of the ring, including the closing point.
    pub fn iter_points(&self) -> impl Iterator<Item = &Point3d> {
        self.points.iter()
    }

    /// Iterates over the distinct points of the ring.
    pub fn iter_unique(&self) -> impl Iterator<Item = &Point3d> {
        self.points
            .iter()
            .enumerate()
            .filter(|(i, p)| self.points.iter().position(|other| other == *p) == Some(*i))
            .map(|(_, p)| p)
    }

    /// Number of points including the closing point.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct elevation levels of the ring, sorted ascending.
    pub fn z_levels(&self) -> Vec<f64> {
        let mut levels: Vec<f64> = self.points.iter().map(|p| round_z(p.z)).collect();
        levels.sort_by(|a, b| a.total_cmp(b));
        levels.dedup();
        levels
    }

    /// Lowest and highest elevation of the ring.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let levels = self.z_levels();
        Some((*levels.first()?, *levels.last()?))
    }

    /// Planar projection of the points on the lowest elevation level.
    pub fn base_layer(&self) -> Vec<Point2d> {
        let Some((min_z, max_z)) = self.z_range() else {
            return vec![];
        };

        self.points
            .iter()
            .filter(|p| min_z == max_z || round_z(p.z) == min_z)
            .map(|p| Point2d::new(p.x, p.y))
            .collect()
    }

    /// Returns true if the `(x, y)` projection of the point lies inside the base layer of the ring.
    ///
    /// Uses the crossing number test: a horizontal ray is cast from the point and every edge it crosses
    /// toggles the result.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        let polygon = self.base_layer();
        let Some(last) = polygon.last() else {
            return false;
        };

        let mut is_inside = false;
        let (mut x1, mut y1) = (last.x, last.y);

        for p in &polygon {
            let (x2, y2) = (p.x, p.y);
            if (y < y1) != (y < y2) && x < (x2 - x1) * (y - y1) / (y2 - y1) + x1 {
                is_inside = !is_inside;
            }

            x1 = x2;
            y1 = y2;
        }

        is_inside
    }

    /// Returns true if the point lies inside the planar polygon and between the lowest and highest
    /// elevation of the ring.
    pub fn contains(&self, point: &Point3d) -> bool {
        let Some((min_z, max_z)) = self.z_range() else {
            return false;
        };

        point.z >= min_z - Z_EPSILON
            && point.z <= max_z + Z_EPSILON
            && self.contains_xy(point.x, point.y)
    }

    /// Center of the distinct vertices of the ring.
    pub fn centroid(&self) -> Option<Centroid> {
        let (sum, count) = self
            .iter_unique()
            .fold((Point3d::origin().coords, 0usize), |(sum, count), p| {
                (sum + p.coords, count + 1)
            });
        if count == 0 {
            return None;
        }

        let point = Point3d::from(sum / count as f64);
        let accuracy = self
            .points
            .iter()
            .map(|p| nalgebra::distance(&point, p))
            .fold(0.0, f64::max);

        Some(Centroid { point, accuracy })
    }
}

fn round_z(z: f64) -> f64 {
    (z / Z_EPSILON).round() / Z_EPSILON.recip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> Ring {
        Ring::new(vec![
            Point3d::new(5.0, 5.0, 0.0),
            Point3d::new(5.0, 10.0, 0.0),
            Point3d::new(10.0, 10.0, 0.0),
            Point3d::new(10.0, 5.0, 0.0),
        ])
    }

    fn box_ring() -> Ring {
        let mut points: Vec<Point3d> = square().iter_unique().copied().collect();
        points.extend(square().iter_unique().map(|p| Point3d::new(p.x, p.y, 3.0)));
        Ring::new(points)
    }

    #[test]
    fn closes_ring() {
        let ring = square();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.points()[0], ring.points()[4]);

        let closed = Ring::new(ring.points().to_vec());
        assert_eq!(closed.len(), 5);
    }

    #[test]
    fn empty_ring_contains_nothing() {
        let ring = Ring::default();
        assert!(ring.is_empty());
        assert!(!ring.contains(&Point3d::new(0.0, 0.0, 0.0)));
        assert!(ring.centroid().is_none());
    }

    #[test]
    fn contains_point() {
        let ring = square();
        assert!(ring.contains(&Point3d::new(7.5, 7.5, 0.0)));
        assert!(!ring.contains(&Point3d::new(1.0, 1.0, 0.0)));
        assert!(!ring.contains(&Point3d::new(3.0, 2.0, 0.0)));
        assert!(!ring.contains(&Point3d::new(7.5, 7.5, 1.0)));
    }

    #[test]
    fn contains_concave() {
        let ring = Ring::new(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(10.0, 0.0, 0.0),
            Point3d::new(10.0, 10.0, 0.0),
            Point3d::new(5.0, 2.0, 0.0),
            Point3d::new(0.0, 10.0, 0.0),
        ]);

        assert!(ring.contains_xy(5.0, 1.0));
        assert!(ring.contains_xy(9.0, 8.0));
        assert!(!ring.contains_xy(5.0, 5.0));
    }

    #[test]
    fn prism_uses_base_layer() {
        let ring = box_ring();
        assert_eq!(ring.z_levels(), vec![0.0, 3.0]);
        assert_eq!(ring.base_layer().len(), 5);
        assert!(ring.contains(&Point3d::new(7.5, 7.5, 1.5)));
        assert!(ring.contains(&Point3d::new(7.5, 7.5, 3.0)));
        assert!(!ring.contains(&Point3d::new(7.5, 7.5, 3.5)));
        assert!(!ring.contains(&Point3d::new(7.5, 7.5, -0.5)));
    }

    #[test]
    fn centroid() {
        let centroid = square().centroid().expect("not empty");
        assert_abs_diff_eq!(centroid.point, Point3d::new(7.5, 7.5, 0.0));
        assert_abs_diff_eq!(centroid.accuracy, 12.5f64.sqrt());

        let centroid = box_ring().centroid().expect("not empty");
        assert_abs_diff_eq!(centroid.point, Point3d::new(7.5, 7.5, 1.5));
    }
}
