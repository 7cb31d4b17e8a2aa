//! Service banner and health reporting.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` when the store and the model are both usable, else `degraded`.
    pub status: String,
    pub store: String,
    pub store_connected: bool,
    pub model_configured: bool,
    pub model_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub version: String,
}

/// Report store connectivity and model availability.
///
/// Always 200; a degraded service still accepts tickets and classifies them
/// with the heuristic.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = match state.tickets.ping().await {
        Ok(()) => true,
        Err(e) => {
            error!(subsystem = "api", op = "health", error = %e, "Ticket store health check failed");
            false
        }
    };

    let classifier = state.classifier();
    let model_configured = classifier.model_configured();
    let model_reachable = model_configured && classifier.model_reachable().await;

    let status = if store_connected && model_configured && model_reachable {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store: state.store.as_str().to_string(),
        store_connected,
        model_configured,
        model_reachable,
        model: classifier.model_name().map(str::to_string),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Service banner with the endpoint list.
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Support ticket triage API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "create_ticket": "POST /create_ticket",
            "process_ticket": "POST /process-ticket",
        }
    }))
}
