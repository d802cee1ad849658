//! PostgreSQL-backed `TransactionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TransactionPersistenceError, TransactionRepository};
use crate::domain::{
    Currency, EventId, Money, PaymentMethod, PaymentProvider, ProviderReference, TicketId,
    Transaction, TransactionId, TransactionRecord, TransactionStatus, UserId,
};

use super::diesel_helpers::{count_from_db, count_to_db, map_diesel_error, map_pool_error};
use super::models::{NewTransactionRow, TransactionRow, TransactionUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::transactions;

/// Diesel-backed implementation of the transaction repository port.
#[derive(Clone)]
pub struct DieselTransactionRepository {
    pool: DbPool,
}

impl DieselTransactionRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> TransactionPersistenceError {
    map_pool_error(error, TransactionPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TransactionPersistenceError {
    map_diesel_error(
        error,
        TransactionPersistenceError::query,
        TransactionPersistenceError::connection,
    )
}

fn corrupt(err: impl std::fmt::Display) -> TransactionPersistenceError {
    TransactionPersistenceError::query(err.to_string())
}

fn row_to_transaction(row: TransactionRow) -> Result<Transaction, TransactionPersistenceError> {
    let currency = Currency::new(&row.currency).map_err(corrupt)?;
    let amount = Money::from_cents(row.amount_cents, currency).map_err(corrupt)?;
    let status = row.status.parse::<TransactionStatus>().map_err(corrupt)?;
    let method = row.method.parse::<PaymentMethod>().map_err(corrupt)?;
    let quantity = count_from_db(row.quantity, "quantity").map_err(corrupt)?;
    let provider_reference = match (row.provider, row.provider_reference) {
        (Some(provider), Some(external_id)) => Some(ProviderReference {
            provider: provider.parse::<PaymentProvider>().map_err(corrupt)?,
            external_id,
        }),
        (None, None) => None,
        _ => {
            return Err(TransactionPersistenceError::query(
                "provider and provider_reference must be set together",
            ));
        }
    };
    Transaction::restore(TransactionRecord {
        id: TransactionId::from_uuid(row.id),
        user_id: row.user_id.map(UserId::from_uuid),
        event_id: EventId::from_uuid(row.event_id),
        ticket_id: TicketId::from_uuid(row.ticket_id),
        quantity,
        amount,
        status,
        method,
        provider_reference,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(corrupt)
}

#[async_trait]
impl TransactionRepository for DieselTransactionRepository {
    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, TransactionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = transactions::table
            .filter(transactions::id.eq(id.as_uuid()))
            .select(TransactionRow::as_select())
            .first::<TransactionRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_transaction).transpose()
    }

    async fn find_by_provider_reference(
        &self,
        provider: PaymentProvider,
        external_id: &str,
    ) -> Result<Option<Transaction>, TransactionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = transactions::table
            .filter(transactions::provider.eq(provider.as_str()))
            .filter(transactions::provider_reference.eq(external_id))
            .select(TransactionRow::as_select())
            .first::<TransactionRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_transaction).transpose()
    }

    async fn list_paid_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, TransactionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<TransactionRow> = transactions::table
            .filter(transactions::user_id.eq(user_id.as_uuid()))
            .filter(transactions::status.eq(TransactionStatus::Paid.as_str()))
            .order((transactions::created_at.desc(), transactions::id.desc()))
            .select(TransactionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_transaction).collect()
    }

    async fn save(&self, transaction: &Transaction) -> Result<(), TransactionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let quantity = count_to_db(transaction.quantity(), "quantity")
            .map_err(TransactionPersistenceError::query)?;
        let reference = transaction.provider_reference();
        let new_row = NewTransactionRow {
            id: *transaction.id().as_uuid(),
            user_id: transaction.user_id().map(|id| *id.as_uuid()),
            event_id: *transaction.event_id().as_uuid(),
            ticket_id: *transaction.ticket_id().as_uuid(),
            quantity,
            amount_cents: transaction.amount().cents(),
            currency: transaction.amount().currency().as_str(),
            status: transaction.status().as_str(),
            method: transaction.method().as_str(),
            provider: reference.map(|r| r.provider.as_str()),
            provider_reference: reference.map(|r| r.external_id.as_str()),
            created_at: transaction.created_at(),
            updated_at: transaction.updated_at(),
        };
        let update_row = TransactionUpdate {
            status: new_row.status,
            provider: new_row.provider,
            provider_reference: new_row.provider_reference,
            updated_at: new_row.updated_at,
        };

        diesel::insert_into(transactions::table)
            .values(&new_row)
            .on_conflict(transactions::id)
            .do_update()
            .set(&update_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
