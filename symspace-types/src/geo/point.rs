use crate::error::SymspaceTypesError;
use crate::geo::datum::Datum;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Point on the surface of a celestial body.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// Geographic point that can be constructed from coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// Distance, bearing and destination calculations on the mean sphere of a [`Datum`].
///
/// The calculations are precise enough for building-scale extents (up to a few kilometers). This trait is
/// auto-implemented for all `f64` geographic points.
pub trait GeodesicPoint: GeoPoint<Num = f64> {
    /// Great-circle distance in meters.
    fn distance(&self, other: &impl GeoPoint<Num = f64>, datum: &Datum) -> f64 {
        let d_lat = other.lat_rad() - self.lat_rad();
        let d_lon = other.lon_rad() - self.lon_rad();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat_rad().cos() * other.lat_rad().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        datum.mean_radius() * c
    }

    /// Initial bearing towards `other` in degrees clockwise from north, in the range `[0, 360)`.
    fn bearing(&self, other: &impl GeoPoint<Num = f64>) -> f64 {
        let d_lon = other.lon_rad() - self.lon_rad();
        let y = d_lon.sin() * other.lat_rad().cos();
        let x = self.lat_rad().cos() * other.lat_rad().sin()
            - self.lat_rad().sin() * other.lat_rad().cos() * d_lon.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Point reached by travelling `distance` meters along the initial `bearing` (degrees clockwise from
    /// north).
    fn destination<P: NewGeoPoint<f64>>(&self, bearing: f64, distance: f64, datum: &Datum) -> P {
        let angular = distance / datum.mean_radius();
        let bearing = bearing.to_radians();
        let lat1 = self.lat_rad();
        let lon1 = self.lon_rad();

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        let lon2 = (lon2.to_degrees() + 540.0) % 360.0 - 180.0;
        P::latlon(lat2.to_degrees(), lon2)
    }
}

impl<T: GeoPoint<Num = f64>> GeodesicPoint for T {}

/// Geographic position with altitude in meters above the datum surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint3d {
    lat: f64,
    lon: f64,
    alt: f64,
}

impl GeoPoint for GeoPoint3d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint3d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon, alt: 0.0 }
    }
}

impl GeoPoint3d {
    /// Creates a new point.
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Altitude in meters.
    pub fn alt(&self) -> f64 {
        self.alt
    }

    /// Returns a copy of the point with the given altitude.
    pub fn with_alt(self, alt: f64) -> Self {
        Self { alt, ..self }
    }

    /// Coordinates in GeoJSON order: `[lon, lat, alt]`.
    pub fn to_lon_lat_alt(&self) -> [f64; 3] {
        [self.lon, self.lat, self.alt]
    }

    /// Point reached by travelling along `bearing` for `distance` meters. Altitude is kept.
    pub fn offset(&self, bearing: f64, distance: f64, datum: &Datum) -> Self {
        let dest: Self = self.destination(bearing, distance, datum);
        dest.with_alt(self.alt)
    }
}

impl TryFrom<&[f64]> for GeoPoint3d {
    type Error = SymspaceTypesError;

    /// Reads a GeoJSON position (`[lon, lat]` or `[lon, lat, alt]`).
    fn try_from(value: &[f64]) -> Result<Self, Self::Error> {
        match value {
            [lon, lat] => Ok(Self::new(*lat, *lon, 0.0)),
            [lon, lat, alt, ..] => Ok(Self::new(*lat, *lon, *alt)),
            _ => Err(SymspaceTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            )),
        }
    }
}

/// Creates a new [`GeoPoint3d`] from latitude and longitude (degrees) and an optional altitude (meters).
///
/// ```
/// use symspace_types::geo::GeoPoint;
/// use symspace_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::geo::GeoPoint3d::new($lat, $lon, 0.0)
    };
    ($lat:expr, $lon:expr, $alt:expr) => {
        $crate::geo::GeoPoint3d::new($lat, $lon, $alt)
    };
}
