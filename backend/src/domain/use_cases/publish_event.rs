//! Publish a draft event.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::EventRepository;
use crate::domain::service_support::map_event_repository_error;
use crate::domain::{Error, Event, EventId, UserId};

/// Publishes events for their organizer.
pub struct PublishEvent<E> {
    events: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<E> PublishEvent<E> {
    /// Use case over the event repository.
    pub fn new(events: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }
}

impl<E> PublishEvent<E>
where
    E: EventRepository,
{
    /// Publish `event_id`; already published events are returned unchanged
    /// and not written again.
    pub async fn execute(&self, event_id: EventId, organizer_id: UserId) -> Result<Event, Error> {
        let mut event = self
            .events
            .find_by_id(&event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))?;
        if !event.is_organized_by(organizer_id) {
            return Err(Error::forbidden("Only the organizer can publish this event"));
        }
        if event.is_published() {
            return Ok(event);
        }
        event.publish(self.clock.utc());
        self.events
            .save(&event)
            .await
            .map_err(map_event_repository_error)?;
        info!(event_id = %event.id(), "event published");
        Ok(event)
    }
}
