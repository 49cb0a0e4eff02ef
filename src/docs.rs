use crate::api::checkin::{GateStatus, LocationReport};
use crate::api::history::HistoryResponse;
use crate::api::roster::RosterResponse;
use crate::api::settings::{ReferenceResponse, SetReference};
use crate::auth::handlers::{LoginReq, RegisterReq, UserResponse};
use crate::geo::Coordinate;
use crate::geofence::GeofenceStatus;
use crate::model::record::CheckInRecord;
use crate::model::role::Role;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GeoCheckin API",
        version = "1.0.0",
        description = r#"
## Geofenced Attendance Check-in

This API powers a location-gated attendance system: a device continuously
reports its position, the server compares it against the configured
reference point, and the check-in action unlocks only within the allowed
radius.

### 🔹 Key Features
- **Check-in**
  - Live geofence gate state, one durable record per check-in
- **History**
  - Personal check-in history, newest first
- **Roster**
  - Today's attendance roster for administrators
- **Settings**
  - Administrators move the geofence center

### 🔐 Sessions
A single persisted session identifies the signed-in user; register or
log in first, log out to clear it.

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::checkin::report_location,
        crate::api::checkin::status,
        crate::api::checkin::check_in,

        crate::api::history::my_history,
        crate::api::roster::today_roster,

        crate::api::settings::get_reference,
        crate::api::settings::set_reference
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            UserResponse,
            Role,
            Coordinate,
            GeofenceStatus,
            LocationReport,
            GateStatus,
            CheckInRecord,
            HistoryResponse,
            RosterResponse,
            SetReference,
            ReferenceResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and session APIs"),
        (name = "CheckIn", description = "Location reporting and check-in APIs"),
        (name = "History", description = "Personal attendance history APIs"),
        (name = "Roster", description = "Admin attendance roster APIs"),
        (name = "Settings", description = "Admin geofence settings APIs"),
    )
)]
pub struct ApiDoc;
