//! Ticket service implementing ticket type management ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CreateTicketRequest, EventRepository, EventTicketRepository, TicketCommand, TicketQuery,
    UpdateTicketRequest,
};
use crate::domain::service_support::{
    map_event_repository_error, map_ticket_error, map_ticket_repository_error,
};
use crate::domain::{Error, Event, EventId, EventTicket, TicketId, UserId};

const NOT_ORGANIZER: &str = "Only the organizer can manage tickets for this event";

/// Ticket type management over event and ticket repositories.
pub struct TicketService<E, T> {
    events: Arc<E>,
    tickets: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<E, T> TicketService<E, T> {
    /// Create a new ticket service.
    pub fn new(events: Arc<E>, tickets: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            tickets,
            clock,
        }
    }
}

impl<E, T> TicketService<E, T>
where
    E: EventRepository,
    T: EventTicketRepository,
{
    async fn load_event(&self, event_id: &EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))
    }

    async fn load_ticket(&self, ticket_id: &TicketId) -> Result<EventTicket, Error> {
        self.tickets
            .find_by_id(ticket_id)
            .await
            .map_err(map_ticket_repository_error)?
            .ok_or_else(|| Error::not_found("Ticket not found"))
    }

    /// Load a ticket and check `organizer_id` runs its event.
    async fn load_managed_ticket(
        &self,
        ticket_id: &TicketId,
        organizer_id: UserId,
    ) -> Result<EventTicket, Error> {
        let ticket = self.load_ticket(ticket_id).await?;
        let event = self.load_event(&ticket.event_id()).await?;
        if !event.is_organized_by(organizer_id) {
            return Err(Error::forbidden(NOT_ORGANIZER));
        }
        Ok(ticket)
    }
}

#[async_trait]
impl<E, T> TicketCommand for TicketService<E, T>
where
    E: EventRepository,
    T: EventTicketRepository,
{
    async fn create(&self, request: CreateTicketRequest) -> Result<EventTicket, Error> {
        let event = self.load_event(&request.event_id).await?;
        if !event.is_organized_by(request.organizer_id) {
            return Err(Error::forbidden(NOT_ORGANIZER));
        }
        let ticket = EventTicket::new(
            TicketId::random(),
            event.id(),
            request.details,
            self.clock.utc(),
        )
        .map_err(map_ticket_error)?;
        self.tickets
            .save(&ticket)
            .await
            .map_err(map_ticket_repository_error)?;
        info!(ticket_id = %ticket.id(), event_id = %event.id(), "ticket type created");
        Ok(ticket)
    }

    async fn update(&self, request: UpdateTicketRequest) -> Result<EventTicket, Error> {
        let mut ticket = self
            .load_managed_ticket(&request.ticket_id, request.organizer_id)
            .await?;
        ticket
            .apply(request.changes, self.clock.utc())
            .map_err(map_ticket_error)?;
        self.tickets
            .save(&ticket)
            .await
            .map_err(map_ticket_repository_error)?;
        info!(ticket_id = %ticket.id(), "ticket type updated");
        Ok(ticket)
    }

    async fn delete(&self, organizer_id: UserId, ticket_id: TicketId) -> Result<(), Error> {
        self.load_managed_ticket(&ticket_id, organizer_id).await?;
        let deleted = self
            .tickets
            .delete(&ticket_id)
            .await
            .map_err(map_ticket_repository_error)?;
        if !deleted {
            return Err(Error::not_found("Ticket not found"));
        }
        info!(ticket_id = %ticket_id, "ticket type deleted");
        Ok(())
    }
}

#[async_trait]
impl<E, T> TicketQuery for TicketService<E, T>
where
    E: EventRepository,
    T: EventTicketRepository,
{
    async fn list_for_event(&self, event_id: &EventId) -> Result<Vec<EventTicket>, Error> {
        self.load_event(event_id).await?;
        self.tickets
            .find_by_event_id(event_id)
            .await
            .map_err(map_ticket_repository_error)
    }
}
