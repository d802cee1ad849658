//! Driving ports for account registration, login, and profile lookup.
use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Mutating account operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account; duplicate emails yield a conflict.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Verify credentials, failing with `unauthorized` on any mismatch.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Read-only account operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Load the user a session belongs to.
    ///
    /// A session pointing at a deleted user is reported as `unauthorized`.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
