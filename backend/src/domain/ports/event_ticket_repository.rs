//! Port abstraction for ticket type persistence, including guarded
//! inventory updates.
use async_trait::async_trait;

use crate::domain::{EventId, EventTicket, TicketId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
        /// Sold quantity changed since the ticket was read.
        StaleInventory { id: String } => "ticket {id} inventory changed concurrently",
        /// The ticket is still referenced by transactions.
        InUse { id: String } => "ticket {id} is referenced by transactions",
    }
}

/// Port for ticket type persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventTicketRepository: Send + Sync {
    /// Fetch a ticket type by identifier.
    async fn find_by_id(&self, id: &TicketId)
    -> Result<Option<EventTicket>, TicketPersistenceError>;

    /// List ticket types for an event in creation order.
    async fn find_by_event_id(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<EventTicket>, TicketPersistenceError>;

    /// Insert a ticket type or update its descriptive fields.
    ///
    /// Updates never overwrite `quantity_sold`; use [`Self::save_reservation`].
    async fn save(&self, ticket: &EventTicket) -> Result<(), TicketPersistenceError>;

    /// Persist a reservation if `quantity_sold` still equals `expected_sold`.
    ///
    /// Returns [`TicketPersistenceError::StaleInventory`] when another writer
    /// got there first.
    async fn save_reservation(
        &self,
        ticket: &EventTicket,
        expected_sold: u32,
    ) -> Result<(), TicketPersistenceError>;

    /// Delete a ticket type; returns `false` when it did not exist.
    async fn delete(&self, id: &TicketId) -> Result<bool, TicketPersistenceError>;
}
