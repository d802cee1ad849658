//! Create a draft event with a unique slug.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{CreateEventRequest, EventRepository, UserRepository};
use crate::domain::service_support::{
    map_event_error, map_event_repository_error, map_user_repository_error,
};
use crate::domain::{Error, Event, EventError, EventId, Slug};

/// Creates draft events on behalf of organizers.
pub struct CreateEvent<U, E> {
    users: Arc<U>,
    events: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<U, E> CreateEvent<U, E> {
    /// Use case over the user and event repositories.
    pub fn new(users: Arc<U>, events: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            events,
            clock,
        }
    }
}

impl<U, E> CreateEvent<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    /// Create a draft event for an organizer.
    pub async fn execute(&self, request: CreateEventRequest) -> Result<Event, Error> {
        let organizer = self
            .users
            .find_by_id(&request.organizer_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("Organizer not found"))?;
        if !organizer.is_organizer() {
            return Err(Error::forbidden("User is not allowed to create events"));
        }
        if request.details.title.trim().is_empty() {
            return Err(map_event_error(EventError::TitleRequired));
        }

        let slug = self.unique_slug(&request.details.title).await?;
        let event = Event::new(
            EventId::random(),
            organizer.id(),
            slug,
            request.details,
            self.clock.utc(),
        )
        .map_err(map_event_error)?;
        self.events
            .save(&event)
            .await
            .map_err(map_event_repository_error)?;
        info!(event_id = %event.id(), slug = %event.slug(), "event created");
        Ok(event)
    }

    /// First free slug among `base`, `base-2`, `base-3`, ...
    async fn unique_slug(&self, title: &str) -> Result<Slug, Error> {
        let base = Slug::from_title(title);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self
            .events
            .find_by_slug(&candidate)
            .await
            .map_err(map_event_repository_error)?
            .is_some()
        {
            candidate = base.with_suffix(suffix);
            suffix += 1;
        }
        Ok(candidate)
    }
}
