//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserAccount, UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, User, UserId, UserName, UserType};

use super::diesel_helpers::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a domain user plus its stored hash.
fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let name =
        UserName::new(&row.name).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let email = Email::new(&row.email).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let user_type = row
        .user_type
        .parse::<UserType>()
        .map_err(|err| UserPersistenceError::query(err.to_string()))?;
    Ok(UserAccount {
        user: User::restore(
            UserId::from_uuid(row.id),
            name,
            email,
            user_type,
            row.created_at,
            row.updated_at,
        ),
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: password_hash.as_ref(),
            user_type: user.user_type().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, "email") {
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row_to_account(row).map(|account| account.user))
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.find_account(email).await?.map(|account| account.user))
    }

    async fn find_account(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            user_type: "ORGANIZER".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_converts_to_account(valid_row: UserRow) {
        let account = row_to_account(valid_row).expect("valid row");
        assert!(account.user.is_organizer());
        assert!(account.password_hash.as_ref().starts_with("$argon2id$"));
    }

    #[rstest]
    fn unknown_user_type_is_query_error(mut valid_row: UserRow) {
        valid_row.user_type = "ADMIN".to_owned();
        let err = row_to_account(valid_row).expect_err("unknown type");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }
}
