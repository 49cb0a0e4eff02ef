use crate::auth::auth::AuthUser;
use crate::model::record::CheckInRecord;
use crate::store::ledger::AttendanceLedger;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RosterResponse {
    #[schema(example = "2026-08-29", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 2)]
    pub present: usize,
    /// One record per present user: whichever a forward pass over the
    /// newest-first ledger met first (their latest check-in of the day).
    pub data: Vec<CheckInRecord>,
}

/// Today's attendance roster. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/roster",
    responses(
        (status = 200, description = "Today's roster", body = RosterResponse),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Roster"
)]
pub async fn today_roster(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let data = ledger.first_per_user_today();
    Ok(HttpResponse::Ok().json(RosterResponse {
        date: Local::now().date_naive(),
        present: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use crate::storage::{SlotFile, test_support::ScratchDir};
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    fn ledger(scratch: &ScratchDir) -> web::Data<AttendanceLedger> {
        web::Data::from(Arc::new(
            AttendanceLedger::open(SlotFile::new(&scratch.0, "ledger.json")).unwrap(),
        ))
    }

    #[tokio::test]
    async fn roster_is_admin_only() {
        let scratch = ScratchDir::new();
        let employee = AuthUser {
            name: "Alice".to_string(),
            role: Role::Employee,
        };

        let err = match today_roster(employee, ledger(&scratch)).await {
            Ok(_) => panic!("employee must not see the roster"),
            Err(e) => e,
        };
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_gets_the_roster() {
        let scratch = ScratchDir::new();
        let admin = AuthUser {
            name: "Boss".to_string(),
            role: Role::Admin,
        };

        assert!(today_roster(admin, ledger(&scratch)).await.is_ok());
    }
}
