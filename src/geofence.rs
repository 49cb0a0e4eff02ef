use crate::geo::{self, Coordinate};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Where the device stands relative to the configured fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeofenceStatus {
    /// No coordinate sample received yet.
    Locating,
    InRange,
    OutOfRange,
    /// Positioning unsupported, denied or hard-failed.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Evaluation {
    pub status: GeofenceStatus,
    /// Only meaningful when a current coordinate exists; 0.0 otherwise.
    pub distance_m: f64,
}

impl Evaluation {
    pub fn error() -> Self {
        Self {
            status: GeofenceStatus::Error,
            distance_m: 0.0,
        }
    }

    pub fn can_check_in(&self) -> bool {
        self.status == GeofenceStatus::InRange
    }
}

/// Combines the latest coordinate sample with the reference point.
///
/// Boundary rule: a distance exactly equal to `radius_m` counts as in
/// range (`distance <= radius`). No hysteresis; callers re-evaluate on
/// every input change.
pub fn evaluate(current: Option<Coordinate>, reference: Coordinate, radius_m: f64) -> Evaluation {
    let Some(current) = current else {
        return Evaluation {
            status: GeofenceStatus::Locating,
            distance_m: 0.0,
        };
    };

    let distance_m = geo::distance_meters(current, reference);
    let status = if distance_m <= radius_m {
        GeofenceStatus::InRange
    } else {
        GeofenceStatus::OutOfRange
    };

    Evaluation { status, distance_m }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f64 = 100.0;

    fn reference() -> Coordinate {
        Coordinate::new(39.9042, 116.4074)
    }

    /// Meters per degree of latitude on the sphere the haversine uses
    /// (R = 6,371,000 m), so walked distances land where intended.
    const METERS_PER_DEGREE_LAT: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

    /// Walks due north from the reference until the haversine distance
    /// matches `target_m` closely enough for boundary tests.
    fn point_at_distance(target_m: f64) -> Coordinate {
        let delta = target_m / METERS_PER_DEGREE_LAT;
        Coordinate::new(reference().latitude + delta, reference().longitude)
    }

    #[test]
    fn missing_sample_is_locating() {
        let eval = evaluate(None, reference(), RADIUS);
        assert_eq!(eval.status, GeofenceStatus::Locating);
        assert_eq!(eval.distance_m, 0.0);
        assert!(!eval.can_check_in());
    }

    #[test]
    fn just_inside_the_radius_is_in_range() {
        let eval = evaluate(Some(point_at_distance(99.9)), reference(), RADIUS);
        assert!(
            eval.distance_m < RADIUS,
            "walked point must measure inside, got {}",
            eval.distance_m
        );
        assert_eq!(eval.status, GeofenceStatus::InRange);
        assert!((eval.distance_m - 99.9).abs() < 0.05);
    }

    #[test]
    fn just_outside_the_radius_is_out_of_range() {
        let eval = evaluate(Some(point_at_distance(100.1)), reference(), RADIUS);
        assert!(
            eval.distance_m > RADIUS,
            "walked point must measure outside, got {}",
            eval.distance_m
        );
        assert_eq!(eval.status, GeofenceStatus::OutOfRange);
        assert!((eval.distance_m - 100.1).abs() < 0.05);
    }

    #[test]
    fn exactly_on_the_boundary_is_in_range() {
        // Feed the computed distance straight back as the radius so the
        // comparison is exact.
        let sample = point_at_distance(100.0);
        let d = crate::geo::distance_meters(sample, reference());
        let eval = evaluate(Some(sample), reference(), d);
        assert_eq!(eval.status, GeofenceStatus::InRange);
    }

    #[test]
    fn thirteen_meters_from_the_reference_is_in_range() {
        let sample = Coordinate::new(39.9043, 116.4075);
        let eval = evaluate(Some(sample), reference(), RADIUS);
        assert_eq!(eval.status, GeofenceStatus::InRange);
        assert!((eval.distance_m - 13.0).abs() < 2.0);
        assert!(eval.can_check_in());
    }
}
