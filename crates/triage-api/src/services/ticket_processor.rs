//! Ticket processing: classify a stored ticket exactly once.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};
use uuid::Uuid;

use triage_core::{ClassificationMethod, Error, Result, Ticket, TicketRepository};
use triage_inference::TicketClassifier;

/// A ticket after a successful classification commit.
#[derive(Debug, Clone)]
pub struct ProcessedTicket {
    pub ticket: Ticket,
    pub method: ClassificationMethod,
}

/// Guards classification so a ticket is labelled at most once.
#[derive(Clone)]
pub struct TicketProcessor {
    tickets: Arc<dyn TicketRepository>,
    classifier: TicketClassifier,
}

impl TicketProcessor {
    pub fn new(tickets: Arc<dyn TicketRepository>, classifier: TicketClassifier) -> Self {
        Self {
            tickets,
            classifier,
        }
    }

    pub fn classifier(&self) -> &TicketClassifier {
        &self.classifier
    }

    /// Classify ticket `id` and persist the labels.
    ///
    /// Fails with `TicketNotFound` for an unknown id and `AlreadyProcessed`
    /// when the ticket is processed before the call or by a concurrent call
    /// that commits first.
    #[instrument(skip(self), fields(subsystem = "api", component = "processor", op = "process_ticket", ticket_id = %id))]
    pub async fn process_ticket(&self, id: Uuid) -> Result<ProcessedTicket> {
        let start = Instant::now();

        let ticket = self.tickets.fetch(id).await?;
        if ticket.processed {
            info!("Ticket already processed, skipping classification");
            return Err(Error::AlreadyProcessed(id));
        }

        let outcome = self.classifier.classify(&ticket.description).await;

        let committed = self
            .tickets
            .commit_classification(id, outcome.result)
            .await?
            .ok_or(Error::AlreadyProcessed(id))?;

        info!(
            category = %outcome.result.category,
            sentiment = %outcome.result.sentiment,
            method = %outcome.method,
            duration_ms = start.elapsed().as_millis() as u64,
            "Ticket processed"
        );

        Ok(ProcessedTicket {
            ticket: committed,
            method: outcome.method,
        })
    }
}
