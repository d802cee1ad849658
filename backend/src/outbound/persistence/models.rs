//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{event_invitations, event_tickets, events, transactions, users, withdrawals};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub user_type: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub slug: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<&'a str>,
    pub capacity: Option<i32>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for upserting event records.
///
/// `treat_none_as_null` lets updates clear optional columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events, treat_none_as_null = true)]
pub(crate) struct EventUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub slug: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<&'a str>,
    pub capacity: Option<i32>,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the event_tickets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = event_tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventTicketRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub quantity_total: i32,
    pub quantity_sold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating ticket types.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_tickets)]
pub(crate) struct NewEventTicketRow<'a> {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub currency: &'a str,
    pub quantity_total: i32,
    pub quantity_sold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for descriptive ticket fields; never touches `quantity_sold`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = event_tickets, treat_none_as_null = true)]
pub(crate) struct EventTicketUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub currency: &'a str,
    pub quantity_total: i32,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the transactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_id: Uuid,
    pub ticket_id: Uuid,
    pub quantity: i32,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub method: String,
    pub provider: Option<String>,
    pub provider_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating transactions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub(crate) struct NewTransactionRow<'a> {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_id: Uuid,
    pub ticket_id: Uuid,
    pub quantity: i32,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub status: &'a str,
    pub method: &'a str,
    pub provider: Option<&'a str>,
    pub provider_reference: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable transaction columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = transactions, treat_none_as_null = true)]
pub(crate) struct TransactionUpdate<'a> {
    pub status: &'a str,
    pub provider: Option<&'a str>,
    pub provider_reference: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the event_invitations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = event_invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvitationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub token: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating invitations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_invitations)]
pub(crate) struct NewInvitationRow<'a> {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: &'a str,
    pub token: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Changeset for invitation responses.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = event_invitations, treat_none_as_null = true)]
pub(crate) struct InvitationUpdate<'a> {
    pub status: &'a str,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Insertable struct for recording withdrawals.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = withdrawals)]
pub(crate) struct NewWithdrawalRow<'a> {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub created_at: DateTime<Utc>,
}
