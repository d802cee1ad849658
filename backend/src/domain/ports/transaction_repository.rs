//! Port abstraction for transaction persistence.
use async_trait::async_trait;

use crate::domain::{PaymentProvider, Transaction, TransactionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by transaction repository adapters.
    pub enum TransactionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "transaction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "transaction repository query failed: {message}",
    }
}

/// Port for transaction persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Fetch a transaction by identifier.
    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, TransactionPersistenceError>;

    /// Fetch the transaction a provider charge belongs to.
    async fn find_by_provider_reference(
        &self,
        provider: PaymentProvider,
        external_id: &str,
    ) -> Result<Option<Transaction>, TransactionPersistenceError>;

    /// List a user's paid transactions, newest first.
    async fn list_paid_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, TransactionPersistenceError>;

    /// Insert or update a transaction.
    async fn save(&self, transaction: &Transaction) -> Result<(), TransactionPersistenceError>;
}
