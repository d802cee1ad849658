//! Port abstraction for organizer balances.
//!
//! Balances are derived, not stored: paid transaction amounts on the
//! organizer's events minus recorded withdrawals. Two concurrent withdrawals
//! may both pass the balance check; adapters do not serialise them.
use async_trait::async_trait;

use crate::domain::{Currency, Money, UserId, Withdrawal};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by wallet repository adapters.
    pub enum WalletPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "wallet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "wallet repository query failed: {message}",
    }
}

/// Port for organizer balances.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Current balance for `organizer_id` in `currency`.
    async fn organizer_balance(
        &self,
        organizer_id: &UserId,
        currency: &Currency,
    ) -> Result<Money, WalletPersistenceError>;

    /// Record a withdrawal.
    async fn withdraw(&self, withdrawal: &Withdrawal) -> Result<(), WalletPersistenceError>;
}
