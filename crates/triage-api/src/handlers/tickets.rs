//! Ticket HTTP handlers.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use triage_core::{Category, ClassificationMethod, CreateTicketRequest, Sentiment};

use super::request_id;
use crate::{ApiError, AppState};

/// Request body for `POST /create_ticket`.
#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    pub ticket_id: Uuid,
    pub description: String,
    pub category: Option<Category>,
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
    pub processed: bool,
    pub message: String,
    pub request_id: String,
}

/// Request body for `POST /process-ticket`. The id is taken as a string so a
/// malformed value maps to 400 rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct ProcessTicketBody {
    pub ticket_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessTicketResponse {
    pub ticket_id: Uuid,
    pub description: String,
    pub category: Category,
    pub sentiment: Sentiment,
    pub processed: bool,
    pub method: ClassificationMethod,
    pub message: String,
    pub request_id: String,
}

/// Store a new, unprocessed ticket.
///
/// # Returns
/// - 201 Created with the stored ticket
/// - 400 Bad Request if the description is outside 10-1000 characters
/// - 500 Internal Server Error if the store fails
pub async fn create_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTicketBody>,
) -> Result<(StatusCode, Json<CreateTicketResponse>), ApiError> {
    let request_id = request_id(&headers);
    let req = CreateTicketRequest::new(body.description)?;
    let ticket = state.tickets.insert(req).await?;

    info!(
        subsystem = "api",
        op = "create_ticket",
        ticket_id = %ticket.id,
        request_id = %request_id,
        "Ticket created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateTicketResponse {
            ticket_id: ticket.id,
            description: ticket.description,
            category: ticket.category,
            sentiment: ticket.sentiment,
            created_at: ticket.created_at,
            processed: ticket.processed,
            message: "Ticket created successfully. Will be processed by automation.".to_string(),
            request_id,
        }),
    ))
}

/// Classify a stored ticket.
///
/// # Returns
/// - 200 OK with labels and the method that produced them
/// - 400 Bad Request if `ticket_id` is not a UUID
/// - 404 Not Found if the ticket doesn't exist
/// - 409 Conflict if the ticket was already processed
/// - 500 Internal Server Error if the store fails
pub async fn process_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProcessTicketBody>,
) -> Result<Json<ProcessTicketResponse>, ApiError> {
    let request_id = request_id(&headers);
    let id = Uuid::parse_str(body.ticket_id.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid ticket_id: {}", body.ticket_id)))?;

    let processed = state.processor.process_ticket(id).await?;
    let classification = processed.ticket.classification().ok_or_else(|| {
        ApiError::Internal(triage_core::Error::Internal(format!(
            "ticket {} committed without labels",
            id
        )))
    })?;

    Ok(Json(ProcessTicketResponse {
        ticket_id: processed.ticket.id,
        description: processed.ticket.description,
        category: classification.category,
        sentiment: classification.sentiment,
        processed: processed.ticket.processed,
        method: processed.method,
        message: "Ticket processed successfully".to_string(),
        request_id,
    }))
}
