//! Port abstraction for event persistence.
use async_trait::async_trait;

use crate::domain::{Event, EventId, EventStatus, Slug, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by event repository adapters.
    pub enum EventPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
        /// Another event already owns the slug.
        DuplicateSlug { slug: String } => "event slug {slug} is already taken",
        /// The event is still referenced by transactions.
        InUse { id: String } => "event {id} is referenced by transactions",
    }
}

/// Optional filters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events of this organizer.
    pub organizer_id: Option<UserId>,
    /// Only events in this status.
    pub status: Option<EventStatus>,
    /// Case-insensitive text matched against title and description.
    pub search: Option<String>,
}

impl EventFilter {
    /// Whether `event` satisfies every populated filter.
    pub fn matches(&self, event: &Event) -> bool {
        if self
            .organizer_id
            .is_some_and(|organizer| !event.is_organized_by(organizer))
        {
            return false;
        }
        if self.status.is_some_and(|status| event.status() != status) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) => {
                event.title().to_lowercase().contains(&needle)
                    || event
                        .description()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Port for event persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventPersistenceError>;

    /// Fetch an event by slug.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, EventPersistenceError>;

    /// List events matching `filter`, ordered by start date ascending.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, EventPersistenceError>;

    /// Insert or update an event.
    async fn save(&self, event: &Event) -> Result<(), EventPersistenceError>;

    /// Delete an event; returns `false` when it did not exist.
    async fn delete(&self, id: &EventId) -> Result<bool, EventPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventDetails;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn event() -> Event {
        Event::new(
            EventId::random(),
            UserId::random(),
            Slug::from_title("Rust Meetup"),
            EventDetails {
                title: "Rust Meetup".into(),
                description: Some("Talks about Tokio".into()),
                start_date: Utc::now(),
                end_date: None,
                location: None,
                capacity: None,
            },
            Utc::now(),
        )
        .expect("valid event")
    }

    #[rstest]
    #[case(Some("meetup"), true)]
    #[case(Some("TOKIO"), true)]
    #[case(Some("python"), false)]
    #[case(None, true)]
    fn search_matches_title_or_description(
        event: Event,
        #[case] search: Option<&str>,
        #[case] expected: bool,
    ) {
        let filter = EventFilter {
            search: search.map(str::to_owned),
            ..EventFilter::default()
        };
        assert_eq!(filter.matches(&event), expected);
    }

    #[rstest]
    fn organizer_and_status_filters_apply(event: Event) {
        let mine = EventFilter {
            organizer_id: Some(event.organizer_id()),
            status: Some(EventStatus::Draft),
            search: None,
        };
        assert!(mine.matches(&event));

        let published = EventFilter {
            status: Some(EventStatus::Published),
            ..mine.clone()
        };
        assert!(!published.matches(&event));

        let other = EventFilter {
            organizer_id: Some(UserId::random()),
            ..EventFilter::default()
        };
        assert!(!other.matches(&event));
    }
}
