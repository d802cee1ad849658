//! Account service implementing registration, login, and profile lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{AccountCommand, AccountQuery, PasswordHasher, UserRepository};
use crate::domain::service_support::{map_hasher_error, map_user_repository_error};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service backed by a user repository and a password hasher.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new account service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("A user with this email already exists"));
        }

        let hash = self
            .hasher
            .hash(&registration.password)
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.name,
            registration.email,
            registration.user_type,
            self.clock.utc(),
        );
        self.users
            .create(&user, &hash)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), user_type = %user.user_type(), "user registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(account) = self
            .users
            .find_account(credentials.email())
            .await
            .map_err(map_user_repository_error)?
        else {
            debug!("login attempt for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(user_id = %account.user.id(), "login attempt with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(account.user)
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}
