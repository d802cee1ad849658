//! PostgreSQL-backed `EventTicketRepository` implementation using Diesel ORM.
//!
//! Sold quantities only move through [`EventTicketRepository::save_reservation`],
//! which guards the update with the previously observed value.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventTicketRepository, TicketPersistenceError};
use crate::domain::{Currency, EventId, EventTicket, Money, TicketDetails, TicketId, TicketRecord};

use super::diesel_helpers::{
    count_from_db, count_to_db, is_check_violation, is_foreign_key_violation, map_diesel_error,
    map_pool_error,
};
use super::models::{EventTicketRow, EventTicketUpdate, NewEventTicketRow};
use super::pool::{DbPool, PoolError};
use super::schema::event_tickets;

/// Table constraint keeping `quantity_sold <= quantity_total`.
const SOLD_WITHIN_TOTAL: &str = "event_tickets_sold_within_total";

/// Diesel-backed implementation of the ticket repository port.
#[derive(Clone)]
pub struct DieselEventTicketRepository {
    pool: DbPool,
}

impl DieselEventTicketRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> TicketPersistenceError {
    map_pool_error(error, TicketPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TicketPersistenceError {
    map_diesel_error(
        error,
        TicketPersistenceError::query,
        TicketPersistenceError::connection,
    )
}

fn row_to_ticket(row: EventTicketRow) -> Result<EventTicket, TicketPersistenceError> {
    let currency =
        Currency::new(&row.currency).map_err(|err| TicketPersistenceError::query(err.to_string()))?;
    let price = Money::from_cents(row.price_cents, currency)
        .map_err(|err| TicketPersistenceError::query(err.to_string()))?;
    let quantity_total =
        count_from_db(row.quantity_total, "quantity_total").map_err(TicketPersistenceError::query)?;
    let quantity_sold =
        count_from_db(row.quantity_sold, "quantity_sold").map_err(TicketPersistenceError::query)?;
    EventTicket::restore(TicketRecord {
        id: TicketId::from_uuid(row.id),
        event_id: EventId::from_uuid(row.event_id),
        details: TicketDetails {
            name: row.name,
            description: row.description,
            price,
            quantity_total,
        },
        quantity_sold,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| TicketPersistenceError::query(err.to_string()))
}

#[async_trait]
impl EventTicketRepository for DieselEventTicketRepository {
    async fn find_by_id(
        &self,
        id: &TicketId,
    ) -> Result<Option<EventTicket>, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = event_tickets::table
            .filter(event_tickets::id.eq(id.as_uuid()))
            .select(EventTicketRow::as_select())
            .first::<EventTicketRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_ticket).transpose()
    }

    async fn find_by_event_id(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<EventTicket>, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<EventTicketRow> = event_tickets::table
            .filter(event_tickets::event_id.eq(event_id.as_uuid()))
            .order((event_tickets::created_at.asc(), event_tickets::id.asc()))
            .select(EventTicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_ticket).collect()
    }

    async fn save(&self, ticket: &EventTicket) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let quantity_total = count_to_db(ticket.quantity_total(), "quantity_total")
            .map_err(TicketPersistenceError::query)?;
        let quantity_sold = count_to_db(ticket.quantity_sold(), "quantity_sold")
            .map_err(TicketPersistenceError::query)?;
        let new_row = NewEventTicketRow {
            id: *ticket.id().as_uuid(),
            event_id: *ticket.event_id().as_uuid(),
            name: ticket.name(),
            description: ticket.description(),
            price_cents: ticket.price().cents(),
            currency: ticket.price().currency().as_str(),
            quantity_total,
            quantity_sold,
            created_at: ticket.created_at(),
            updated_at: ticket.updated_at(),
        };
        let update_row = EventTicketUpdate {
            name: new_row.name,
            description: new_row.description,
            price_cents: new_row.price_cents,
            currency: new_row.currency,
            quantity_total,
            updated_at: new_row.updated_at,
        };

        diesel::insert_into(event_tickets::table)
            .values(&new_row)
            .on_conflict(event_tickets::id)
            .do_update()
            .set(&update_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                // A reservation landed after the caller read the sold count.
                if is_check_violation(&err, SOLD_WITHIN_TOTAL) {
                    TicketPersistenceError::stale_inventory(ticket.id().to_string())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn save_reservation(
        &self,
        ticket: &EventTicket,
        expected_sold: u32,
    ) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let expected =
            count_to_db(expected_sold, "quantity_sold").map_err(TicketPersistenceError::query)?;
        let sold = count_to_db(ticket.quantity_sold(), "quantity_sold")
            .map_err(TicketPersistenceError::query)?;
        let updated = diesel::update(
            event_tickets::table
                .filter(event_tickets::id.eq(ticket.id().as_uuid()))
                .filter(event_tickets::quantity_sold.eq(expected)),
        )
        .set((
            event_tickets::quantity_sold.eq(sold),
            event_tickets::updated_at.eq(ticket.updated_at()),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        if updated == 0 {
            return Err(TicketPersistenceError::stale_inventory(
                ticket.id().to_string(),
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = event_tickets::table.filter(event_tickets::id.eq(id.as_uuid()));
        let deleted = diesel::delete(target)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    TicketPersistenceError::in_use(id.to_string())
                } else {
                    diesel_error(err)
                }
            })?;
        Ok(deleted > 0)
    }
}
