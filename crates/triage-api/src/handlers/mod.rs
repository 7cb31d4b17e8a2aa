//! HTTP handlers for triage-api.

pub mod health;
pub mod tickets;

use axum::http::HeaderMap;
use uuid::Uuid;

pub use health::{health_check, root};
pub use tickets::{create_ticket, process_ticket};

/// Correlation id for response bodies: the `x-request-id` header set by the
/// request-id layer, or a fresh UUIDv7 when the layer is absent.
pub(crate) fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}
