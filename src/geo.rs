use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    #[schema(example = 39.9042)]
    pub latitude: f64,
    #[schema(example = 116.4074)]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Great-circle (haversine) distance in meters between two coordinates.
///
/// Pure: symmetric, zero for identical inputs, never negative.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = Coordinate::new(39.9042, 116.4074);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(39.9042, 116.4074);
        let b = Coordinate::new(31.2304, 121.4737);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn distance_is_non_negative() {
        let a = Coordinate::new(-33.8688, 151.2093);
        let b = Coordinate::new(51.5074, -0.1278);
        assert!(distance_meters(a, b) >= 0.0);
    }

    #[test]
    fn one_ten_thousandth_degree_near_beijing_is_about_thirteen_meters() {
        let reference = Coordinate::new(39.9042, 116.4074);
        let sample = Coordinate::new(39.9043, 116.4075);
        let d = distance_meters(reference, sample);
        assert!((d - 13.0).abs() < 2.0, "expected ~13m, got {d}");
    }

    #[test]
    fn coordinate_validity_bounds() {
        assert!(Coordinate::new(39.9042, 116.4074).is_valid());
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn beijing_to_shanghai_is_about_1067_km() {
        let beijing = Coordinate::new(39.9042, 116.4074);
        let shanghai = Coordinate::new(31.2304, 121.4737);
        let d = distance_meters(beijing, shanghai);
        assert!((1_050_000.0..1_080_000.0).contains(&d), "got {d}");
    }
}
