//! In-process ticket store.
//!
//! Backs `TICKET_STORE=memory` for local runs without PostgreSQL, and the
//! router tests. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use triage_core::{
    ClassificationResult, CreateTicketRequest, Error, Result, Ticket, TicketRepository,
};

/// HashMap-backed ticket store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryTicketRepository {
    tickets: Arc<RwLock<HashMap<Uuid, Ticket>>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets.
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn insert(&self, req: CreateTicketRequest) -> Result<Ticket> {
        let ticket = Ticket {
            id: Uuid::now_v7(),
            description: req.description,
            category: None,
            sentiment: None,
            processed: false,
            created_at: Utc::now(),
        };
        self.tickets.write().await.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn fetch(&self, id: Uuid) -> Result<Ticket> {
        self.tickets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::TicketNotFound(id))
    }

    async fn commit_classification(
        &self,
        id: Uuid,
        result: ClassificationResult,
    ) -> Result<Option<Ticket>> {
        // Check and write under one write guard.
        let mut tickets = self.tickets.write().await;
        match tickets.get_mut(&id) {
            Some(ticket) if !ticket.processed => {
                ticket.category = Some(result.category);
                ticket.sentiment = Some(result.sentiment);
                ticket.processed = true;
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
