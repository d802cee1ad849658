//! PostgreSQL-backed `InvitationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InvitationPersistenceError, InvitationRepository};
use crate::domain::{
    Email, EventId, Invitation, InvitationId, InvitationRecord, InvitationStatus, InvitationToken,
};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{InvitationRow, InvitationUpdate, NewInvitationRow};
use super::pool::{DbPool, PoolError};
use super::schema::event_invitations;

/// Diesel-backed implementation of the invitation repository port.
#[derive(Clone)]
pub struct DieselInvitationRepository {
    pool: DbPool,
}

impl DieselInvitationRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> InvitationPersistenceError {
    map_pool_error(error, InvitationPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> InvitationPersistenceError {
    map_diesel_error(
        error,
        InvitationPersistenceError::query,
        InvitationPersistenceError::connection,
    )
}

fn row_to_invitation(row: InvitationRow) -> Result<Invitation, InvitationPersistenceError> {
    let email =
        Email::new(&row.email).map_err(|err| InvitationPersistenceError::query(err.to_string()))?;
    let token = InvitationToken::new(&row.token)
        .map_err(|err| InvitationPersistenceError::query(err.to_string()))?;
    let status = row
        .status
        .parse::<InvitationStatus>()
        .map_err(|err| InvitationPersistenceError::query(err.to_string()))?;
    Ok(Invitation::restore(InvitationRecord {
        id: InvitationId::from_uuid(row.id),
        event_id: EventId::from_uuid(row.event_id),
        email,
        token,
        status,
        created_at: row.created_at,
        responded_at: row.responded_at,
    }))
}

#[async_trait]
impl InvitationRepository for DieselInvitationRepository {
    async fn find_by_token(
        &self,
        token: &InvitationToken,
    ) -> Result<Option<Invitation>, InvitationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = event_invitations::table
            .filter(event_invitations::token.eq(token.as_ref()))
            .select(InvitationRow::as_select())
            .first::<InvitationRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_invitation).transpose()
    }

    async fn find_by_event_id(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<Invitation>, InvitationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<InvitationRow> = event_invitations::table
            .filter(event_invitations::event_id.eq(event_id.as_uuid()))
            .order((
                event_invitations::created_at.asc(),
                event_invitations::id.asc(),
            ))
            .select(InvitationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_invitation).collect()
    }

    async fn save(&self, invitation: &Invitation) -> Result<(), InvitationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let new_row = NewInvitationRow {
            id: *invitation.id().as_uuid(),
            event_id: *invitation.event_id().as_uuid(),
            email: invitation.email().as_ref(),
            token: invitation.token().as_ref(),
            status: invitation.status().as_str(),
            created_at: invitation.created_at(),
            responded_at: invitation.responded_at(),
        };
        let update_row = InvitationUpdate {
            status: new_row.status,
            responded_at: new_row.responded_at,
        };

        diesel::insert_into(event_invitations::table)
            .values(&new_row)
            .on_conflict(event_invitations::id)
            .do_update()
            .set(&update_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
