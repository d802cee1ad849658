//! Event service implementing event command and query driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CreateEventRequest, EventCommand, EventFilter, EventQuery, EventRepository,
    UpdateEventRequest, UserRepository,
};
use crate::domain::service_support::{map_event_error, map_event_repository_error};
use crate::domain::use_cases::{CreateEvent, PublishEvent};
use crate::domain::{Error, Event, EventId, Slug, UserId};

/// Event management over user and event repositories.
pub struct EventService<U, E> {
    events: Arc<E>,
    create_event: CreateEvent<U, E>,
    publish_event: PublishEvent<E>,
    clock: Arc<dyn Clock>,
}

impl<U, E> EventService<U, E> {
    /// Create a new event service.
    pub fn new(users: Arc<U>, events: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            create_event: CreateEvent::new(users, Arc::clone(&events), Arc::clone(&clock)),
            publish_event: PublishEvent::new(Arc::clone(&events), Arc::clone(&clock)),
            events,
            clock,
        }
    }
}

impl<U, E> EventService<U, E>
where
    E: EventRepository,
{
    async fn load(&self, event_id: &EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))
    }

    async fn load_owned(
        &self,
        event_id: &EventId,
        organizer_id: UserId,
        action: &str,
    ) -> Result<Event, Error> {
        let event = self.load(event_id).await?;
        if !event.is_organized_by(organizer_id) {
            return Err(Error::forbidden(format!(
                "Only the organizer can {action} this event"
            )));
        }
        Ok(event)
    }
}

#[async_trait]
impl<U, E> EventCommand for EventService<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    async fn create(&self, request: CreateEventRequest) -> Result<Event, Error> {
        self.create_event.execute(request).await
    }

    async fn update(&self, request: UpdateEventRequest) -> Result<Event, Error> {
        let mut event = self
            .load_owned(&request.event_id, request.organizer_id, "update")
            .await?;
        event
            .apply(request.changes, self.clock.utc())
            .map_err(map_event_error)?;
        self.events
            .save(&event)
            .await
            .map_err(map_event_repository_error)?;
        info!(event_id = %event.id(), "event updated");
        Ok(event)
    }

    async fn publish(&self, organizer_id: UserId, event_id: EventId) -> Result<Event, Error> {
        self.publish_event.execute(event_id, organizer_id).await
    }

    async fn delete(&self, organizer_id: UserId, event_id: EventId) -> Result<(), Error> {
        self.load_owned(&event_id, organizer_id, "delete").await?;
        let deleted = self
            .events
            .delete(&event_id)
            .await
            .map_err(map_event_repository_error)?;
        if !deleted {
            return Err(Error::not_found("Event not found"));
        }
        info!(event_id = %event_id, "event deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, E> EventQuery for EventService<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    async fn get(&self, event_id: &EventId) -> Result<Event, Error> {
        self.load(event_id).await
    }

    async fn get_by_slug(&self, slug: &Slug) -> Result<Event, Error> {
        self.events
            .find_by_slug(slug)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))
    }

    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, Error> {
        self.events
            .list(&filter)
            .await
            .map_err(map_event_repository_error)
    }
}
