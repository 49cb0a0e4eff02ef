use crate::auth::auth::AuthUser;
use crate::model::record::CheckInRecord;
use crate::store::ledger::AttendanceLedger;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub data: Vec<CheckInRecord>,
    #[schema(example = 3)]
    pub total: usize,
}

/// The caller's own check-in history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    responses(
        (status = 200, description = "Personal check-in history", body = HistoryResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "History"
)]
pub async fn my_history(auth: AuthUser, ledger: web::Data<AttendanceLedger>) -> impl Responder {
    let data = ledger.records_for_user(&auth.name);
    let total = data.len();
    HttpResponse::Ok().json(HistoryResponse { data, total })
}
