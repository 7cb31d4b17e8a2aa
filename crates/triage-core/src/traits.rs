//! Core traits for the ticket store and model backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// TICKET REPOSITORY
// =============================================================================

/// Persistent ticket store.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert a new, unprocessed ticket.
    async fn insert(&self, req: CreateTicketRequest) -> Result<Ticket>;

    /// Fetch a ticket by ID. Fails with `Error::TicketNotFound` if absent.
    async fn fetch(&self, id: Uuid) -> Result<Ticket>;

    /// Write labels and `processed = true`, only if the ticket is still
    /// unprocessed.
    ///
    /// Returns the updated ticket, or `None` when the ticket was already
    /// processed (or does not exist) at write time.
    async fn commit_classification(
        &self,
        id: Uuid,
        result: ClassificationResult,
    ) -> Result<Option<Ticket>>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
