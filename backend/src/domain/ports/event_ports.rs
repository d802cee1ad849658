//! Driving ports for event management.
use async_trait::async_trait;

use super::EventFilter;
use crate::domain::{Error, Event, EventChanges, EventDetails, EventId, Slug, UserId};

/// Request to create a draft event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    /// Organizer creating the event.
    pub organizer_id: UserId,
    /// Fields of the new event.
    pub details: EventDetails,
}

/// Request to change an existing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEventRequest {
    /// Organizer asking for the change.
    pub organizer_id: UserId,
    /// Event to change.
    pub event_id: EventId,
    /// Fields to change.
    pub changes: EventChanges,
}

/// Driving port for event changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Create a draft event for an organizer.
    async fn create(&self, request: CreateEventRequest) -> Result<Event, Error>;

    /// Change an event owned by the organizer.
    async fn update(&self, request: UpdateEventRequest) -> Result<Event, Error>;

    /// Publish a draft event; already published events are returned as is.
    async fn publish(&self, organizer_id: UserId, event_id: EventId) -> Result<Event, Error>;

    /// Delete an event that has no transactions.
    async fn delete(&self, organizer_id: UserId, event_id: EventId) -> Result<(), Error>;
}

/// Driving port for event reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// Fetch an event by identifier.
    async fn get(&self, event_id: &EventId) -> Result<Event, Error>;

    /// Fetch an event by slug.
    async fn get_by_slug(&self, slug: &Slug) -> Result<Event, Error>;

    /// Events matching `filter`, soonest first.
    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, Error>;
}
