use crate::cartesian::Point3d;
use crate::geo::datum::Datum;
use crate::geo::point::{GeoPoint3d, GeodesicPoint};
use serde::{Deserialize, Serialize};

/// Metric frame anchored at a geographic origin.
///
/// The `x` axis of the frame points along `heading` (degrees clockwise from north) and the `y` axis points
/// along `heading - 90`. A local offset is converted into geographic coordinates with two successive
/// destination steps (first along `x`, then along `y`), so no projected coordinate system is needed. This
/// is accurate for extents up to a few hundred meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    origin: GeoPoint3d,
    heading: f64,
    datum: Datum,
}

impl LocalFrame {
    /// Creates a new frame.
    pub fn new(origin: GeoPoint3d, heading: f64, datum: Datum) -> Self {
        Self {
            origin,
            heading,
            datum,
        }
    }

    /// Geographic position of the local point `(0, 0, 0)`.
    pub fn origin(&self) -> GeoPoint3d {
        self.origin
    }

    /// Direction of the `x` axis in degrees clockwise from north.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Earth model of the frame.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Converts a local point into a geographic position.
    pub fn to_geographic(&self, point: &Point3d) -> GeoPoint3d {
        let along_x = self.origin.offset(self.heading, point.x, &self.datum);
        along_x
            .offset(self.heading - 90.0, point.y, &self.datum)
            .with_alt(self.origin.alt() + point.z)
    }

    /// Converts a geographic position into a local point.
    pub fn to_local(&self, position: &GeoPoint3d) -> Point3d {
        let d = self.origin.distance(position, &self.datum);
        let a = (self.heading - self.origin.bearing(position)).to_radians();

        Point3d::new(d * a.cos(), d * a.sin(), position.alt() - self.origin.alt())
    }

    /// Converts a ring of geographic vertices into local points by walking consecutive vertices.
    ///
    /// The first vertex is placed at `(0, 0)`. Each following vertex is offset from the previous local point
    /// by the distance between the two geographic vertices, turned by the difference between the bearing of
    /// the edge and the frame heading. Elevation is taken relative to the first vertex.
    pub fn local_ring(&self, vertices: &[GeoPoint3d]) -> Vec<Point3d> {
        let Some(first) = vertices.first() else {
            return vec![];
        };

        let mut local = Vec::with_capacity(vertices.len());
        local.push(Point3d::new(0.0, 0.0, 0.0));

        for edge in vertices.windows(2) {
            let (from, to) = (&edge[0], &edge[1]);
            let d = from.distance(to, &self.datum);
            let a = (self.heading - from.bearing(to)).to_radians();

            let prev = local[local.len() - 1];
            local.push(Point3d::new(
                prev.x + d * a.cos(),
                prev.y + d * a.sin(),
                to.alt() - first.alt(),
            ));
        }

        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;
    use approx::assert_abs_diff_eq;

    fn frame() -> LocalFrame {
        LocalFrame::new(latlon!(50.82, 4.39, 10.0), -34.04, Datum::WGS84)
    }

    #[test]
    fn axes_follow_heading() {
        let frame = frame();
        let origin = frame.origin();

        let x = frame.to_geographic(&Point3d::new(10.0, 0.0, 0.0));
        assert_abs_diff_eq!(origin.bearing(&x), 360.0 - 34.04, epsilon = 1e-4);

        let y = frame.to_geographic(&Point3d::new(0.0, 10.0, 0.0));
        assert_abs_diff_eq!(origin.bearing(&y), 360.0 - 124.04, epsilon = 1e-4);
    }

    #[test]
    fn round_trip() {
        let frame = frame();
        let local = Point3d::new(25.0, 30.0, 4.5);
        let back = frame.to_local(&frame.to_geographic(&local));

        assert_abs_diff_eq!(back, local, epsilon = 1e-3);
    }

    #[test]
    fn altitude_is_relative_to_origin() {
        let frame = frame();
        let geo = frame.to_geographic(&Point3d::new(0.0, 0.0, 3.0));
        assert_abs_diff_eq!(geo.alt(), 13.0);
        assert_abs_diff_eq!(frame.to_local(&geo).z, 3.0);
    }

    #[test]
    fn local_ring_matches_frame() {
        let frame = frame();
        let local = [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(0.0, 37.27, 0.0),
            Point3d::new(46.275, 37.27, 0.0),
            Point3d::new(46.275, 0.0, 0.0),
        ];
        let geo: Vec<_> = local.iter().map(|p| frame.to_geographic(p)).collect();
        let walked = frame.local_ring(&geo);

        assert_eq!(walked.len(), 4);
        for (a, b) in walked.iter().zip(local.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn empty_ring() {
        assert!(frame().local_ring(&[]).is_empty());
    }
}
