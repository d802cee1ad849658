//! Event endpoints.
//!
//! ```text
//! GET    /api/v1/events?organizerId=&status=&q=
//! POST   /api/v1/events
//! GET    /api/v1/events/{id}
//! GET    /api/v1/events/slug/{slug}
//! PATCH  /api/v1/events/{id}
//! DELETE /api/v1/events/{id}
//! POST   /api/v1/events/{id}/publish
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateEventRequest, EventFilter, UpdateEventRequest};
use crate::domain::{Error, EventChanges, EventDetails, EventId, EventStatus, Slug, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::EventResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, nullable, parse_id, parse_optional_id,
    parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp, parse_value, require,
};

const EVENT_ID: FieldName = FieldName::new("id");
const ORGANIZER_ID: FieldName = FieldName::new("organizerId");
const STATUS: FieldName = FieldName::new("status");
const TITLE: FieldName = FieldName::new("title");
const START_DATE: FieldName = FieldName::new("startDate");
const END_DATE: FieldName = FieldName::new("endDate");
const CAPACITY: FieldName = FieldName::new("capacity");

/// Filters for `GET /events`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// Only events of this organizer.
    pub organizer_id: Option<String>,
    /// `DRAFT` or `PUBLISHED`.
    pub status: Option<String>,
    /// Case-insensitive text matched against title and description.
    pub q: Option<String>,
}

impl TryFrom<EventListQuery> for EventFilter {
    type Error = Error;

    fn try_from(query: EventListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            organizer_id: parse_optional_id(query.organizer_id.as_deref(), ORGANIZER_ID)?,
            status: query
                .status
                .as_deref()
                .map(|raw| parse_value::<EventStatus>(raw, STATUS))
                .transpose()?,
            search: query
                .q
                .map(|q| q.trim().to_owned())
                .filter(|q| !q.is_empty()),
        })
    }
}

/// Payload for creating an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventBody {
    /// Required, 3 to 255 characters.
    #[schema(example = "Rust Meetup")]
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Required RFC 3339 timestamp.
    #[schema(example = "2030-05-01T19:00:00Z")]
    pub start_date: Option<String>,
    /// RFC 3339 timestamp, not before the start.
    pub end_date: Option<String>,
    /// Venue or address.
    pub location: Option<String>,
    /// Positive attendee cap.
    pub capacity: Option<i64>,
}

impl TryFrom<CreateEventBody> for EventDetails {
    type Error = Error;

    fn try_from(body: CreateEventBody) -> Result<Self, Self::Error> {
        let start_date = require(body.start_date, START_DATE)?;
        Ok(Self {
            title: require(body.title, TITLE)?,
            description: body.description,
            start_date: parse_rfc3339_timestamp(&start_date, START_DATE)?,
            end_date: parse_optional_rfc3339_timestamp(body.end_date.as_deref(), END_DATE)?,
            location: body.location,
            capacity: body.capacity.map(parse_capacity).transpose()?,
        })
    }
}

/// Partial update; `null` clears optional fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventBody {
    /// New title.
    pub title: Option<String>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// New RFC 3339 start.
    pub start_date: Option<String>,
    /// New RFC 3339 end; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<String>>,
    /// New location; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    /// New cap; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub capacity: Option<Option<i64>>,
}

impl TryFrom<UpdateEventBody> for EventChanges {
    type Error = Error;

    fn try_from(body: UpdateEventBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: body.title,
            description: body.description,
            start_date: body
                .start_date
                .as_deref()
                .map(|raw| parse_rfc3339_timestamp(raw, START_DATE))
                .transpose()?,
            end_date: body
                .end_date
                .map(|inner| parse_optional_rfc3339_timestamp(inner.as_deref(), END_DATE))
                .transpose()?,
            location: body.location,
            capacity: body
                .capacity
                .map(|inner| inner.map(parse_capacity).transpose())
                .transpose()?,
        })
    }
}

fn parse_capacity(raw: i64) -> Result<u32, Error> {
    u32::try_from(raw)
        .ok()
        .filter(|capacity| *capacity > 0)
        .ok_or_else(|| invalid_field_error(CAPACITY, "Capacity must be greater than zero"))
}

fn event_id(raw: &str) -> Result<EventId, Error> {
    parse_id(raw, EVENT_ID)
}

fn json_list(events: &[crate::domain::Event]) -> Vec<EventResponse> {
    events.iter().map(EventResponse::from).collect()
}

/// List events.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "Events ordered by start date", body = [EventResponse]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    query: web::Query<EventListQuery>,
) -> ApiResult<web::Json<Vec<EventResponse>>> {
    let filter = EventFilter::try_from(query.into_inner())?;
    let events = state.events_query.list(filter).await?;
    Ok(web::Json(json_list(&events)))
}

/// Create a draft event owned by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventBody,
    responses(
        (status = 201, description = "Draft event created", body = EventResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an organizer", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventBody>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let details = EventDetails::try_from(payload.into_inner())?;
    let event = state
        .events
        .create(CreateEventRequest {
            organizer_id,
            details,
        })
        .await?;
    Ok(HttpResponse::Created().json(EventResponse::from(&event)))
}

/// Fetch an event by slug.
#[utoipa::path(
    get,
    path = "/api/v1/events/slug/{slug}",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["events"],
    operation_id = "getEventBySlug",
    security([])
)]
#[get("/events/slug/{slug}")]
pub async fn get_event_by_slug(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventResponse>> {
    let slug = Slug::new(path.into_inner()).map_err(|_| Error::not_found("Event not found"))?;
    let event = state.events_query.get_by_slug(&slug).await?;
    Ok(web::Json(EventResponse::from(&event)))
}

/// Fetch an event by id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security([])
)]
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventResponse>> {
    let id = event_id(&path)?;
    let event = state.events_query.get(&id).await?;
    Ok(web::Json(EventResponse::from(&event)))
}

/// Change an event.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    request_body = UpdateEventBody,
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[patch("/events/{id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateEventBody>,
) -> ApiResult<web::Json<EventResponse>> {
    let organizer_id = session.require_user_id()?;
    let event_id = event_id(&path)?;
    let changes = EventChanges::try_from(payload.into_inner())?;
    let event = state
        .events
        .update(UpdateEventRequest {
            organizer_id,
            event_id,
            changes,
        })
        .await?;
    Ok(web::Json(EventResponse::from(&event)))
}

/// Delete an event with no transactions.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Event has transactions", body = Error)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let organizer_id: UserId = session.require_user_id()?;
    let event_id = event_id(&path)?;
    state.events.delete(organizer_id, event_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Publish a draft event.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/publish",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Published event", body = EventResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["events"],
    operation_id = "publishEvent"
)]
#[post("/events/{id}/publish")]
pub async fn publish_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventResponse>> {
    let organizer_id = session.require_user_id()?;
    let event_id = event_id(&path)?;
    let event = state.events.publish(organizer_id, event_id).await?;
    Ok(web::Json(EventResponse::from(&event)))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
