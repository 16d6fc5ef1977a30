use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mean earth radius used for every distance in this workspace.
///
/// Haversine over a sphere of this radius is the one geodesic formula used, so
/// distances are reproducible bit for bit across platforms.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// A position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the coordinate if both components are finite and inside the
    /// valid latitude/longitude ranges.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then(|| Self::new(latitude, longitude))
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Haversine distance in meters between two positions given in degrees.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Axis-aligned latitude/longitude extent of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Smallest box containing all coordinates, `None` for an empty input.
    pub fn from_coordinates<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_latitude: first.latitude,
            max_latitude: first.latitude,
            min_longitude: first.longitude,
            max_longitude: first.longitude,
        };
        for coordinate in iter {
            bounds.min_latitude = bounds.min_latitude.min(coordinate.latitude);
            bounds.max_latitude = bounds.max_latitude.max(coordinate.latitude);
            bounds.min_longitude = bounds.min_longitude.min(coordinate.longitude);
            bounds.max_longitude = bounds.max_longitude.max(coordinate.longitude);
        }
        Some(bounds)
    }

    pub fn latitude_span(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    pub fn longitude_span(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }
}

impl Default for BoundingBox {
    /// The unit box, used when there is nothing to bound.
    fn default() -> Self {
        Self {
            min_latitude: 0.0,
            max_latitude: 1.0,
            min_longitude: 0.0,
            max_longitude: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111_195.0).abs() < 1.0);
    }

    #[test]
    fn distance_along_a_meridian_is_radius_times_angle() {
        let a = Coordinate::new(54.3, 10.1);
        let b = Coordinate::new(54.3 + 0.01, 10.1);
        let expected = EARTH_RADIUS_M * 0.01_f64.to_radians();
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let a = Coordinate::new(-33.9, 151.2);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn checked_rejects_out_of_range_and_nan() {
        assert!(Coordinate::checked(91.0, 0.0).is_none());
        assert!(Coordinate::checked(0.0, -180.5).is_none());
        assert!(Coordinate::checked(f64::NAN, 0.0).is_none());
        assert!(Coordinate::checked(45.0, 179.9).is_some());
    }

    #[test]
    fn bounding_box_covers_all_points() {
        let bounds = BoundingBox::from_coordinates([
            Coordinate::new(1.0, 5.0),
            Coordinate::new(-2.0, 7.0),
            Coordinate::new(0.5, 4.0),
        ])
        .unwrap();
        assert_eq!(bounds.min_latitude, -2.0);
        assert_eq!(bounds.max_latitude, 1.0);
        assert_eq!(bounds.min_longitude, 4.0);
        assert_eq!(bounds.max_longitude, 7.0);
        assert_eq!(bounds.latitude_span(), 3.0);
    }

    #[test]
    fn empty_input_has_no_bounding_box() {
        assert!(BoundingBox::from_coordinates(Vec::new()).is_none());
    }
}
