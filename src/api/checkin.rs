use crate::auth::auth::AuthUser;
use crate::error::Error;
use crate::geo::Coordinate;
use crate::geofence::GeofenceStatus;
use crate::service::checkin::CheckInService;
use crate::service::monitor::GeofenceMonitor;
use crate::store::reference::ReferencePointStore;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use utoipa::ToSchema;

/// Report side of the device fix feed consumed by the location tracker.
pub struct FixFeed(pub mpsc::Sender<Coordinate>);

#[derive(Deserialize, ToSchema)]
pub struct LocationReport {
    #[schema(example = 39.9043)]
    pub latitude: f64,
    #[schema(example = 116.4075)]
    pub longitude: f64,
}

#[derive(Serialize, ToSchema)]
pub struct GateStatus {
    pub status: GeofenceStatus,
    /// Meaningful only once a fix exists; 0.0 while locating.
    #[schema(example = 13.0)]
    pub distance_m: f64,
    pub reference: Coordinate,
    #[schema(example = 100.0)]
    pub radius_m: f64,
}

/// Device position report. Feeds the continuous watch with a fresh fix.
#[utoipa::path(
    post,
    path = "/api/v1/location",
    request_body = LocationReport,
    responses(
        (status = 202, description = "Fix accepted", body = Object, example = json!({
            "message": "Fix accepted"
        })),
        (status = 400, description = "Coordinate out of range"),
        (status = 401, description = "Not signed in")
    ),
    tag = "CheckIn"
)]
pub async fn report_location(
    _auth: AuthUser,
    body: web::Json<LocationReport>,
    feed: web::Data<FixFeed>,
) -> Result<HttpResponse, Error> {
    let coord = Coordinate::new(body.latitude, body.longitude);
    if !coord.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Latitude must be within [-90, 90] and longitude within [-180, 180]"
        })));
    }

    feed.0
        .send(coord)
        .await
        .map_err(|_| Error::Internal("position watch is not running".to_string()))?;

    Ok(HttpResponse::Accepted().json(json!({ "message": "Fix accepted" })))
}

/// Current geofence gate state for the check-in screen.
#[utoipa::path(
    get,
    path = "/api/v1/checkin/status",
    responses(
        (status = 200, description = "Gate state", body = GateStatus),
        (status = 401, description = "Not signed in")
    ),
    tag = "CheckIn"
)]
pub async fn status(
    _auth: AuthUser,
    monitor: web::Data<GeofenceMonitor>,
    reference: web::Data<ReferencePointStore>,
) -> impl Responder {
    let eval = monitor.snapshot();
    HttpResponse::Ok().json(GateStatus {
        status: eval.status,
        distance_m: eval.distance_m,
        reference: reference.get(),
        radius_m: monitor.radius_m(),
    })
}

/// Check-in endpoint. Only available while the device is in range.
#[utoipa::path(
    post,
    path = "/api/v1/checkin",
    responses(
        (status = 200, description = "Checked in successfully", body = CheckInRecord),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "Out of range, still locating, or a check-in is in flight", body = Object, example = json!({
            "error": "check-in unavailable: OUT_OF_RANGE"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "CheckIn"
)]
pub async fn check_in(
    auth: AuthUser,
    service: web::Data<CheckInService>,
) -> Result<HttpResponse, Error> {
    let record = service.check_in(&auth.name).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn alice() -> AuthUser {
        AuthUser {
            name: "Alice".to_string(),
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn out_of_range_coordinate_is_rejected() {
        let (tx, mut rx) = mpsc::channel(1);
        let report = LocationReport {
            latitude: 95.0,
            longitude: 0.0,
        };
        let resp = report_location(alice(), web::Json(report), web::Data::new(FixFeed(tx)))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn valid_report_reaches_the_fix_feed() {
        let (tx, mut rx) = mpsc::channel(1);
        let report = LocationReport {
            latitude: 39.9043,
            longitude: 116.4075,
        };
        let resp = report_location(alice(), web::Json(report), web::Data::new(FixFeed(tx)))
            .await
            .unwrap();
        assert_eq!(resp.status(), 202);
        assert_eq!(rx.recv().await, Some(Coordinate::new(39.9043, 116.4075)));
    }
}
