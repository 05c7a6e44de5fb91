//! Coordinates and great-circle distance.

use serde::Serialize;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Values are taken as returned by the geocoder; no range checking is done.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
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

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Returns false when either component is zero or not finite.
    ///
    /// Geocoders answer some unknown inputs with a 200 and an empty or zeroed
    /// geometry; such a value must never be stored.
    pub fn is_resolved(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude != 0.0
            && self.longitude != 0.0
    }
}

/// Haversine distance between two points given in degrees, in kilometres.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(distance_km(-23.5505, -46.6333, -23.5505, -46.6333), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let sao_paulo = Coordinate::new(-23.5505, -46.6333);
        let rio = Coordinate::new(-22.9068, -43.1729);

        assert_eq!(sao_paulo.distance_to(&rio), rio.distance_to(&sao_paulo));
    }

    #[test]
    fn test_one_degree_of_longitude_on_equator() {
        assert_abs_diff_eq!(distance_km(0.0, 0.0, 0.0, 1.0), 111.19, epsilon = 0.5);
    }

    #[test]
    fn test_known_city_pair() {
        // São Paulo to Rio de Janeiro is roughly 360 km in a straight line.
        let d = distance_km(-23.5505, -46.6333, -22.9068, -43.1729);
        assert_abs_diff_eq!(d, 360.7, epsilon = 2.0);
    }

    #[test]
    fn test_distance_grows_with_separation() {
        let origin = Coordinate::new(0.0, 0.0);
        let near = origin.distance_to(&Coordinate::new(0.0, 0.5));
        let mid = origin.distance_to(&Coordinate::new(0.0, 1.0));
        let far = origin.distance_to(&Coordinate::new(0.0, 5.0));

        assert!(near < mid);
        assert!(mid < far);
        assert_abs_diff_eq!(near, 55.6, epsilon = 0.1);
        assert_abs_diff_eq!(far, 555.97, epsilon = 0.5);
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert_abs_diff_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_is_resolved() {
        assert!(Coordinate::new(-23.55, -46.63).is_resolved());
        assert!(!Coordinate::new(0.0, -46.63).is_resolved());
        assert!(!Coordinate::new(-23.55, 0.0).is_resolved());
        assert!(!Coordinate::new(f64::NAN, -46.63).is_resolved());
        assert!(!Coordinate::new(-23.55, f64::INFINITY).is_resolved());
    }
}
