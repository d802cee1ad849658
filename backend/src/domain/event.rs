//! Events organised by users and published for ticket sales.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, Slug, UserId};

/// Minimum number of characters in an event title.
pub const EVENT_TITLE_MIN: usize = 3;
/// Maximum number of characters in an event title.
pub const EVENT_TITLE_MAX: usize = 255;
/// Maximum number of characters in an event location.
pub const EVENT_LOCATION_MAX: usize = 255;

/// Validation errors for event fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The title is blank once trimmed.
    #[error("Event title is required")]
    TitleRequired,
    /// The title is shorter than [`EVENT_TITLE_MIN`] once trimmed.
    #[error("Event title must be at least {min} characters")]
    TitleTooShort { min: usize },
    /// The title is longer than [`EVENT_TITLE_MAX`].
    #[error("Event title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// The location is longer than [`EVENT_LOCATION_MAX`].
    #[error("Location must be at most {max} characters")]
    LocationTooLong { max: usize },
    /// The end date precedes the start date.
    #[error("End date must not be before the start date")]
    EndBeforeStart,
    /// A capacity of zero was supplied.
    #[error("Capacity must be greater than zero")]
    InvalidCapacity,
    /// A stored status is not recognised.
    #[error("Unknown event status: {value}")]
    UnknownStatus { value: String },
}

impl EventError {
    /// Wire name of the request field at fault, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::TitleRequired | Self::TitleTooShort { .. } | Self::TitleTooLong { .. } => {
                Some("title")
            }
            Self::LocationTooLong { .. } => Some("location"),
            Self::EndBeforeStart => Some("endDate"),
            Self::InvalidCapacity => Some("capacity"),
            Self::UnknownStatus { .. } => None,
        }
    }
}

/// Publication state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Visible to the organizer only; tickets cannot be bought.
    #[default]
    Draft,
    /// Open for ticket sales.
    Published,
}

impl EventStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            _ => Err(EventError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Descriptive fields supplied when creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    /// Title, 3 to 255 characters.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// When the event starts.
    pub start_date: DateTime<Utc>,
    /// When the event ends, if known.
    pub end_date: Option<DateTime<Utc>>,
    /// Venue or address.
    pub location: Option<String>,
    /// Attendee cap, if any.
    pub capacity: Option<u32>,
}

/// Partial update of an event. `None` leaves a field unchanged; the inner
/// `Option` of nullable fields clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New start.
    pub start_date: Option<DateTime<Utc>>,
    /// New end.
    pub end_date: Option<Option<DateTime<Utc>>>,
    /// New location.
    pub location: Option<Option<String>>,
    /// New attendee cap.
    pub capacity: Option<Option<u32>>,
}

/// Stored representation used to rehydrate an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Identifier.
    pub id: EventId,
    /// Organizer owning the event.
    pub organizer_id: UserId,
    /// URL slug derived from the title.
    pub slug: Slug,
    /// Descriptive fields.
    pub details: EventDetails,
    /// Draft or published.
    pub status: EventStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Event aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: EventId,
    organizer_id: UserId,
    slug: Slug,
    details: EventDetails,
    status: EventStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Event {
    /// Create a draft event.
    pub fn new(
        id: EventId,
        organizer_id: UserId,
        slug: Slug,
        details: EventDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, EventError> {
        Self::restore(EventRecord {
            id,
            organizer_id,
            slug,
            details,
            status: EventStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored event, re-checking field invariants.
    pub fn restore(record: EventRecord) -> Result<Self, EventError> {
        let details = normalise_details(record.details)?;
        Ok(Self {
            id: record.id,
            organizer_id: record.organizer_id,
            slug: record.slug,
            details,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Organizer owning the event.
    pub fn organizer_id(&self) -> UserId {
        self.organizer_id
    }

    /// URL slug.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.details.title
    }

    /// Description, if any.
    pub fn description(&self) -> Option<&str> {
        self.details.description.as_deref()
    }

    /// Start time.
    pub fn start_date(&self) -> DateTime<Utc> {
        self.details.start_date
    }

    /// End time, if set.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.details.end_date
    }

    /// Location, if set.
    pub fn location(&self) -> Option<&str> {
        self.details.location.as_deref()
    }

    /// Attendee cap, if set.
    pub fn capacity(&self) -> Option<u32> {
        self.details.capacity
    }

    /// Current status.
    pub fn status(&self) -> EventStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether tickets may be sold.
    pub fn is_published(&self) -> bool {
        self.status == EventStatus::Published
    }

    /// Whether `user_id` organises this event.
    pub fn is_organized_by(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }

    /// Publish the event. Publishing twice leaves the event untouched.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        if self.is_published() {
            return;
        }
        self.status = EventStatus::Published;
        self.updated_at = now;
    }

    /// Apply a partial update. The event is unchanged when validation fails.
    pub fn apply(&mut self, changes: EventChanges, now: DateTime<Utc>) -> Result<(), EventError> {
        let mut details = self.details.clone();
        if let Some(title) = changes.title {
            details.title = title;
        }
        if let Some(description) = changes.description {
            details.description = description;
        }
        if let Some(start_date) = changes.start_date {
            details.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            details.end_date = end_date;
        }
        if let Some(location) = changes.location {
            details.location = location;
        }
        if let Some(capacity) = changes.capacity {
            details.capacity = capacity;
        }
        self.details = normalise_details(details)?;
        self.updated_at = now;
        Ok(())
    }
}

fn normalise_details(details: EventDetails) -> Result<EventDetails, EventError> {
    let title = details.title.trim();
    if title.is_empty() {
        return Err(EventError::TitleRequired);
    }
    let title_length = title.chars().count();
    if title_length < EVENT_TITLE_MIN {
        return Err(EventError::TitleTooShort {
            min: EVENT_TITLE_MIN,
        });
    }
    if title_length > EVENT_TITLE_MAX {
        return Err(EventError::TitleTooLong {
            max: EVENT_TITLE_MAX,
        });
    }
    let location = trim_optional(details.location);
    if location
        .as_deref()
        .is_some_and(|location| location.chars().count() > EVENT_LOCATION_MAX)
    {
        return Err(EventError::LocationTooLong {
            max: EVENT_LOCATION_MAX,
        });
    }
    if details.end_date.is_some_and(|end| end < details.start_date) {
        return Err(EventError::EndBeforeStart);
    }
    if details.capacity == Some(0) {
        return Err(EventError::InvalidCapacity);
    }
    Ok(EventDetails {
        title: title.to_owned(),
        description: trim_optional(details.description),
        start_date: details.start_date,
        end_date: details.end_date,
        location,
        capacity: details.capacity,
    })
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
