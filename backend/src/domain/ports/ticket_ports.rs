//! Driving ports for ticket type management.
use async_trait::async_trait;

use crate::domain::{Error, EventId, EventTicket, TicketChanges, TicketDetails, TicketId, UserId};

/// Request to add a ticket type to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    /// Organizer adding the ticket type.
    pub organizer_id: UserId,
    /// Event it is sold for.
    pub event_id: EventId,
    /// Fields of the new ticket type.
    pub details: TicketDetails,
}

/// Request to change a ticket type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTicketRequest {
    /// Organizer asking for the change.
    pub organizer_id: UserId,
    /// Ticket type to change.
    pub ticket_id: TicketId,
    /// Fields to change.
    pub changes: TicketChanges,
}

/// Driving port for ticket type changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// Add a ticket type to an organizer's event.
    async fn create(&self, request: CreateTicketRequest) -> Result<EventTicket, Error>;

    /// Change a ticket type.
    async fn update(&self, request: UpdateTicketRequest) -> Result<EventTicket, Error>;

    /// Delete a ticket type nobody has bought.
    async fn delete(&self, organizer_id: UserId, ticket_id: TicketId) -> Result<(), Error>;
}

/// Driving port for ticket type reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// Ticket types of an existing event.
    async fn list_for_event(&self, event_id: &EventId) -> Result<Vec<EventTicket>, Error>;
}
