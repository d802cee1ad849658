//! PostgreSQL-backed `WalletRepository` implementation.
//!
//! Balances are derived on read: paid sales of the organizer's events minus
//! recorded withdrawals, per currency.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text, Uuid as SqlUuid};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{WalletPersistenceError, WalletRepository};
use crate::domain::{Currency, Money, UserId, Withdrawal};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::NewWithdrawalRow;
use super::pool::{DbPool, PoolError};
use super::schema::withdrawals;

const BALANCE_SQL: &str = r#"
SELECT
    COALESCE((
        SELECT SUM(t.amount_cents)
        FROM transactions t
        JOIN events e ON e.id = t.event_id
        WHERE e.organizer_id = $1 AND t.currency = $2 AND t.status = 'PAID'
    ), 0)::BIGINT
    -
    COALESCE((
        SELECT SUM(w.amount_cents)
        FROM withdrawals w
        WHERE w.organizer_id = $1 AND w.currency = $2
    ), 0)::BIGINT AS balance_cents
"#;

#[derive(Debug, QueryableByName)]
struct BalanceRow {
    #[diesel(sql_type = BigInt)]
    balance_cents: i64,
}

/// Diesel-backed implementation of the wallet repository port.
#[derive(Clone)]
pub struct DieselWalletRepository {
    pool: DbPool,
}

impl DieselWalletRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> WalletPersistenceError {
    map_pool_error(error, WalletPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> WalletPersistenceError {
    map_diesel_error(
        error,
        WalletPersistenceError::query,
        WalletPersistenceError::connection,
    )
}

/// Turn a derived balance into money; overdrawn balances read as zero.
fn balance_to_money(
    organizer_id: &UserId,
    cents: i64,
    currency: &Currency,
) -> Result<Money, WalletPersistenceError> {
    if cents < 0 {
        warn!(%organizer_id, cents, %currency, "organizer balance is overdrawn");
        return Ok(Money::zero(currency.clone()));
    }
    Money::from_cents(cents, currency.clone())
        .map_err(|err| WalletPersistenceError::query(err.to_string()))
}

#[async_trait]
impl WalletRepository for DieselWalletRepository {
    async fn organizer_balance(
        &self,
        organizer_id: &UserId,
        currency: &Currency,
    ) -> Result<Money, WalletPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: BalanceRow = sql_query(BALANCE_SQL)
            .bind::<SqlUuid, _>(*organizer_id.as_uuid())
            .bind::<Text, _>(currency.as_str())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        balance_to_money(organizer_id, row.balance_cents, currency)
    }

    async fn withdraw(&self, withdrawal: &Withdrawal) -> Result<(), WalletPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewWithdrawalRow {
            id: *withdrawal.id.as_uuid(),
            organizer_id: *withdrawal.organizer_id.as_uuid(),
            amount_cents: withdrawal.amount.cents(),
            currency: withdrawal.amount.currency().as_str(),
            created_at: withdrawal.created_at,
        };
        diesel::insert_into(withdrawals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
