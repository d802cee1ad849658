//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventFilter, EventPersistenceError, EventRepository};
use crate::domain::{Event, EventDetails, EventId, EventRecord, EventStatus, Slug, UserId};

use super::diesel_helpers::{
    count_from_db, count_to_db, is_foreign_key_violation, is_unique_violation, map_diesel_error,
    map_pool_error,
};
use super::models::{EventRow, EventUpdate, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> EventPersistenceError {
    map_pool_error(error, EventPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> EventPersistenceError {
    map_diesel_error(
        error,
        EventPersistenceError::query,
        EventPersistenceError::connection,
    )
}

fn row_to_event(row: EventRow) -> Result<Event, EventPersistenceError> {
    let slug = Slug::new(row.slug).map_err(|err| EventPersistenceError::query(err.to_string()))?;
    let status = row
        .status
        .parse::<EventStatus>()
        .map_err(|err| EventPersistenceError::query(err.to_string()))?;
    let capacity = row
        .capacity
        .map(|value| count_from_db(value, "capacity"))
        .transpose()
        .map_err(EventPersistenceError::query)?;
    Event::restore(EventRecord {
        id: EventId::from_uuid(row.id),
        organizer_id: UserId::from_uuid(row.organizer_id),
        slug,
        details: EventDetails {
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location,
            capacity,
        },
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| EventPersistenceError::query(err.to_string()))
}

/// Escape `LIKE` wildcards in user supplied search text.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = events::table
            .filter(events::id.eq(id.as_uuid()))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_event).transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = events::table
            .filter(events::slug.eq(slug.as_ref()))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_event).transpose()
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = events::table.into_boxed();
        if let Some(organizer_id) = filter.organizer_id {
            query = query.filter(events::organizer_id.eq(*organizer_id.as_uuid()));
        }
        if let Some(status) = filter.status {
            query = query.filter(events::status.eq(status.as_str()));
        }
        if let Some(search) = filter.search.as_deref() {
            let pattern = like_pattern(search);
            query = query.filter(
                events::title
                    .ilike(pattern.clone())
                    .or(events::description.ilike(pattern)),
            );
        }
        let rows: Vec<EventRow> = query
            .order((events::start_date.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_event).collect()
    }

    async fn save(&self, event: &Event) -> Result<(), EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let capacity = event
            .capacity()
            .map(|value| count_to_db(value, "capacity"))
            .transpose()
            .map_err(EventPersistenceError::query)?;
        let new_row = NewEventRow {
            id: *event.id().as_uuid(),
            organizer_id: *event.organizer_id().as_uuid(),
            title: event.title(),
            description: event.description(),
            slug: event.slug().as_ref(),
            start_date: event.start_date(),
            end_date: event.end_date(),
            location: event.location(),
            capacity,
            status: event.status().as_str(),
            created_at: event.created_at(),
            updated_at: event.updated_at(),
        };
        let update_row = EventUpdate {
            title: new_row.title,
            description: new_row.description,
            slug: new_row.slug,
            start_date: new_row.start_date,
            end_date: new_row.end_date,
            location: new_row.location,
            capacity,
            status: new_row.status,
            updated_at: new_row.updated_at,
        };

        diesel::insert_into(events::table)
            .values(&new_row)
            .on_conflict(events::id)
            .do_update()
            .set(&update_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, "slug") {
                    EventPersistenceError::duplicate_slug(event.slug().as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn delete(&self, id: &EventId) -> Result<bool, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(events::table.filter(events::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    EventPersistenceError::in_use(id.to_string())
                } else {
                    diesel_error(err)
                }
            })?;
        Ok(deleted > 0)
    }
}
