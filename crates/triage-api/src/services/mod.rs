//! Service layer for business logic.

pub mod ticket_processor;

pub use ticket_processor::{ProcessedTicket, TicketProcessor};
