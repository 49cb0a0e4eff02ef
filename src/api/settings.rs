use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::geo::Coordinate;
use crate::store::reference::ReferencePointStore;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SetReference {
    #[schema(example = 39.9042)]
    pub latitude: f64,
    #[schema(example = 116.4074)]
    pub longitude: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ReferenceResponse {
    pub reference: Coordinate,
    #[schema(example = 100.0)]
    pub radius_m: f64,
}

/// Current geofence center and radius. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/settings/reference",
    responses(
        (status = 200, description = "Configured reference point", body = ReferenceResponse),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Settings"
)]
pub async fn get_reference(
    auth: AuthUser,
    reference: web::Data<ReferencePointStore>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    Ok(HttpResponse::Ok().json(ReferenceResponse {
        reference: reference.get(),
        radius_m: config.allowed_radius_m,
    }))
}

/// Moves the geofence center. Effective for all subsequent evaluations
/// immediately. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/settings/reference",
    request_body = SetReference,
    responses(
        (status = 200, description = "Reference point updated", body = Object, example = json!({
            "message": "Reference point updated"
        })),
        (status = 400, description = "Coordinate out of range"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Settings"
)]
pub async fn set_reference(
    auth: AuthUser,
    body: web::Json<SetReference>,
    reference: web::Data<ReferencePointStore>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let coord = Coordinate::new(body.latitude, body.longitude);
    if !coord.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Latitude must be within [-90, 90] and longitude within [-180, 180]"
        })));
    }

    reference.set(coord)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Reference point updated" })))
}
