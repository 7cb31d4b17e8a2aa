//! Shared application state.

use std::sync::Arc;

use triage_core::TicketRepository;
use triage_inference::TicketClassifier;

use crate::config::StoreKind;
use crate::services::TicketProcessor;

/// Handler state. Cheap to clone; everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<dyn TicketRepository>,
    pub processor: Arc<TicketProcessor>,
    pub store: StoreKind,
}

impl AppState {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        classifier: TicketClassifier,
        store: StoreKind,
    ) -> Self {
        let processor = Arc::new(TicketProcessor::new(tickets.clone(), classifier));
        Self {
            tickets,
            processor,
            store,
        }
    }

    pub fn classifier(&self) -> &TicketClassifier {
        self.processor.classifier()
    }
}
