//! Ticket type endpoints.
//!
//! ```text
//! GET    /api/v1/event-tickets?eventId=
//! POST   /api/v1/event-tickets
//! PATCH  /api/v1/event-tickets/{id}
//! DELETE /api/v1/event-tickets/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateTicketRequest, UpdateTicketRequest};
use crate::domain::{Error, EventId, TicketChanges, TicketDetails, TicketId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::TicketResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, nullable, parse_id, parse_money, require,
};

const EVENT_ID: FieldName = FieldName::new("eventId");
const TICKET_ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const PRICE: FieldName = FieldName::new("price");
const QUANTITY_TOTAL: FieldName = FieldName::new("quantityTotal");

/// Query for `GET /event-tickets`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TicketListQuery {
    /// Event whose ticket types are listed.
    pub event_id: Option<String>,
}

/// Payload for adding a ticket type to an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketBody {
    /// Event the ticket type is sold for.
    pub event_id: Option<String>,
    /// Required, 2 to 255 characters.
    #[schema(example = "General admission")]
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Non-negative price of one ticket.
    #[schema(value_type = Option<f64>, example = 50.0)]
    pub price: Option<Decimal>,
    /// Three-letter code; defaults to `BRL`.
    pub currency: Option<String>,
    /// Positive number of seats.
    #[schema(example = 100)]
    pub quantity_total: Option<i64>,
}

/// Partial update of a ticket type.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketBody {
    /// New name.
    pub name: Option<String>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// New price.
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    /// Currency of the new price.
    pub currency: Option<String>,
    /// New seat count; never below the sold count.
    pub quantity_total: Option<i64>,
}

fn parse_quantity_total(raw: i64) -> Result<u32, Error> {
    u32::try_from(raw)
        .ok()
        .filter(|total| *total > 0)
        .ok_or_else(|| {
            invalid_field_error(QUANTITY_TOTAL, "Total quantity must be greater than zero")
        })
}

fn split_create(body: CreateTicketBody) -> Result<(EventId, TicketDetails), Error> {
    let event_id = require(body.event_id, EVENT_ID)?;
    let price = require(body.price, PRICE)?;
    let details = TicketDetails {
        name: require(body.name, NAME)?,
        description: body.description,
        price: parse_money(price, body.currency.as_deref(), PRICE)?,
        quantity_total: parse_quantity_total(require(body.quantity_total, QUANTITY_TOTAL)?)?,
    };
    Ok((parse_id(&event_id, EVENT_ID)?, details))
}

impl TryFrom<UpdateTicketBody> for TicketChanges {
    type Error = Error;

    fn try_from(body: UpdateTicketBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: body.name,
            description: body.description,
            price: body
                .price
                .map(|amount| parse_money(amount, body.currency.as_deref(), PRICE))
                .transpose()?,
            quantity_total: body.quantity_total.map(parse_quantity_total).transpose()?,
        })
    }
}

fn ticket_id(raw: &str) -> Result<TicketId, Error> {
    parse_id(raw, TICKET_ID)
}

/// Ticket types of an event.
#[utoipa::path(
    get,
    path = "/api/v1/event-tickets",
    params(TicketListQuery),
    responses(
        (status = 200, description = "Ticket types", body = [TicketResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Event not found", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "listTickets",
    security([])
)]
#[get("/event-tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    query: web::Query<TicketListQuery>,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    let raw = require(query.into_inner().event_id, EVENT_ID)?;
    let event_id: EventId = parse_id(&raw, EVENT_ID)?;
    let tickets = state.tickets_query.list_for_event(&event_id).await?;
    Ok(web::Json(tickets.iter().map(TicketResponse::from).collect()))
}

/// Add a ticket type to an event.
#[utoipa::path(
    post,
    path = "/api/v1/event-tickets",
    request_body = CreateTicketBody,
    responses(
        (status = 201, description = "Ticket type created", body = TicketResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Event not found", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/event-tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTicketBody>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let (event_id, details) = split_create(payload.into_inner())?;
    let ticket = state
        .tickets
        .create(CreateTicketRequest {
            organizer_id,
            event_id,
            details,
        })
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(&ticket)))
}

/// Change a ticket type.
#[utoipa::path(
    patch,
    path = "/api/v1/event-tickets/{id}",
    params(("id" = String, Path, description = "Ticket id")),
    request_body = UpdateTicketBody,
    responses(
        (status = 200, description = "Updated ticket type", body = TicketResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "updateTicket"
)]
#[patch("/event-tickets/{id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTicketBody>,
) -> ApiResult<web::Json<TicketResponse>> {
    let organizer_id = session.require_user_id()?;
    let ticket_id = ticket_id(&path)?;
    let changes = TicketChanges::try_from(payload.into_inner())?;
    let ticket = state
        .tickets
        .update(UpdateTicketRequest {
            organizer_id,
            ticket_id,
            changes,
        })
        .await?;
    Ok(web::Json(TicketResponse::from(&ticket)))
}

/// Delete a ticket type nobody has bought.
#[utoipa::path(
    delete,
    path = "/api/v1/event-tickets/{id}",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the organizer", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Ticket has transactions", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket"
)]
#[delete("/event-tickets/{id}")]
pub async fn delete_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let ticket_id = ticket_id(&path)?;
    state.tickets.delete(organizer_id, ticket_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
