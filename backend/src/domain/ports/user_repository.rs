//! Port abstraction for user account persistence and its errors.
use async_trait::async_trait;

use crate::domain::{Email, PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail { email: String } => "user with email {email} already exists",
    }
}

/// User together with the credential hash stored for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Stored user.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
}

/// Port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and its password hash for authentication.
    async fn find_account(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;
}
