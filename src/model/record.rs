use crate::geo::Coordinate;
use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One successful check-in. Immutable once created; `user_name` is a weak
/// reference into the identity registry (records outlive users).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckInRecord {
    /// Time-derived unique id: `<epoch_ms>-<uuid prefix>`.
    #[schema(example = "1735689600000-a3f09b21")]
    pub id: String,
    #[schema(example = "Alice")]
    pub user_name: String,
    /// Epoch milliseconds.
    #[schema(example = 1735689600000i64)]
    pub timestamp: i64,
    pub location: Coordinate,
    #[schema(example = "Check-in successful!")]
    pub message: Option<String>,
}

impl CheckInRecord {
    pub fn new(user_name: String, location: Coordinate, message: Option<String>) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        let uuid = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", timestamp, &uuid[..8]),
            user_name,
            timestamp,
            location,
            message,
        }
    }

    /// The record's calendar day in local time.
    pub fn local_day(&self) -> Option<NaiveDate> {
        Local
            .timestamp_millis_opt(self.timestamp)
            .single()
            .map(|dt| dt.date_naive())
    }
}
