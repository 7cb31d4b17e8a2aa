//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;
use tracing::error;

/// Message returned for a ticket that already carries a classification.
pub const ALREADY_PROCESSED_MESSAGE: &str = "Ticket was already processed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Details are logged, never returned.
    #[error(transparent)]
    Internal(triage_core::Error),
}

impl From<triage_core::Error> for ApiError {
    fn from(err: triage_core::Error) -> Self {
        match err {
            triage_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            triage_core::Error::TicketNotFound(_) => ApiError::NotFound("Ticket not found".to_string()),
            triage_core::Error::AlreadyProcessed(_) => {
                ApiError::Conflict(ALREADY_PROCESSED_MESSAGE.to_string())
            }
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
