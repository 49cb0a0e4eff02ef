use crate::geofence::GeofenceStatus;
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

/// Domain failures. Each is terminal to the single attempted operation
/// only; none crash the process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("name already registered: {0}")]
    DuplicateName(String),

    #[error("invalid name or password")]
    InvalidCredentials,

    #[error("not signed in")]
    NoSession,

    #[error("check-in unavailable: {0}")]
    NotInRange(GeofenceStatus),

    #[error("a check-in is already in progress")]
    CheckInInFlight,

    /// A slot write failed; in-memory state was left untouched.
    #[error("failed to persist {slot}: {cause}")]
    Persistence {
        slot: &'static str,
        cause: anyhow::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn persistence(slot: &'static str, cause: anyhow::Error) -> Self {
        Self::Persistence { slot, cause }
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateName(_) => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::NoSession => StatusCode::UNAUTHORIZED,
            Error::NotInRange(_) | Error::CheckInInFlight => StatusCode::CONFLICT,
            Error::Persistence { .. } | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Error::Persistence { slot, cause } = self {
            tracing::error!(slot, error = %cause, "persistence failure");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
