//! Great-circle distance between geographic coordinates
//!
//! Points use the `geo` convention of `x = longitude` and `y = latitude`, in degrees.

use crate::{Result, TripError};
use geo::Point;

/// Mean Earth radius in kilometers used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Maximum absolute latitude in degrees
pub const MAX_LATITUDE: f64 = 90.0;

/// Maximum absolute longitude in degrees
pub const MAX_LONGITUDE: f64 = 180.0;

/// Check if a latitude/longitude pair is finite and within WGS84 bounds
#[inline(always)]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat)
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lng)
}

/// Build a validated `Point<f64>` (x = lng, y = lat)
///
/// # Returns
/// The point, or [`TripError::InvalidCoordinate`] if either component is
/// non-finite or out of range
pub fn coordinate(lat: f64, lng: f64) -> Result<Point<f64>> {
    if !is_valid_coordinate(lat, lng) {
        return Err(TripError::InvalidCoordinate { lat, lng });
    }
    Ok(Point::new(lng, lat))
}

/// Haversine distance in kilometers between two already validated points
#[inline]
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let delta_lat = (b.y() - a.y()).to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance in kilometers between `(lat_a, lng_a)` and `(lat_b, lng_b)`
///
/// # Arguments
/// * `lat_a`, `lng_a` - First coordinate in degrees
/// * `lat_b`, `lng_b` - Second coordinate in degrees
///
/// # Returns
/// A non-negative distance, or [`TripError::InvalidCoordinate`] for the first
/// endpoint that is non-finite or outside `[-90, 90] x [-180, 180]`
pub fn distance_km(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> Result<f64> {
    let a = coordinate(lat_a, lng_a)?;
    let b = coordinate(lat_b, lng_b)?;
    Ok(haversine_km(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_are_zero() {
        for &(lat, lng) in &[(0.0, 0.0), (51.5074, -0.1278), (-25.2637, -57.5759), (90.0, 180.0)] {
            let d = distance_km(lat, lng, lat, lng).unwrap();
            assert!(d.abs() < 1e-12, "expected zero, got {d} for ({lat}, {lng})");
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((51.5074, -0.1278), (48.8566, 2.3522)),
            ((-25.2637, -57.5759), (-25.3000, -57.6000)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((lat_a, lng_a), (lat_b, lng_b)) in pairs {
            let ab = distance_km(lat_a, lng_a, lat_b, lng_b).unwrap();
            let ba = distance_km(lat_b, lng_b, lat_a, lng_a).unwrap();
            assert!((ab - ba).abs() < 1e-9);
        }
    }

    #[test]
    fn test_known_distance_london_paris() {
        let d = distance_km(51.5074, -0.1278, 48.8566, 2.3522).unwrap();
        // Roughly 343.5 km on a 6371 km sphere
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(0.0, 0.0, 1.0, 0.0).unwrap();
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_is_short() {
        let d = distance_km(0.0, 179.9, 0.0, -179.9).unwrap();
        assert!(d < 25.0, "got {d}");
    }

    #[test]
    fn test_out_of_range_latitude_fails() {
        let result = distance_km(90.5, 0.0, 0.0, 0.0);
        assert!(matches!(
            result,
            Err(TripError::InvalidCoordinate { lat, .. }) if lat == 90.5
        ));
    }

    #[test]
    fn test_out_of_range_longitude_fails() {
        assert!(distance_km(0.0, 0.0, 0.0, -180.01).is_err());
    }

    #[test]
    fn test_non_finite_fails() {
        assert!(distance_km(f64::NAN, 0.0, 0.0, 0.0).is_err());
        assert!(distance_km(0.0, f64::INFINITY, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_coordinate_uses_geo_axis_order() {
        let point = coordinate(-25.2637, -57.5759).unwrap();
        assert_eq!(point.y(), -25.2637);
        assert_eq!(point.x(), -57.5759);
    }
}
