//! Port abstraction for invitation persistence.
use async_trait::async_trait;

use crate::domain::{EventId, Invitation, InvitationToken};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by invitation repository adapters.
    pub enum InvitationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "invitation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invitation repository query failed: {message}",
    }
}

/// Port for invitation persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Fetch an invitation by its link token.
    async fn find_by_token(
        &self,
        token: &InvitationToken,
    ) -> Result<Option<Invitation>, InvitationPersistenceError>;

    /// List invitations for an event, oldest first.
    async fn find_by_event_id(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<Invitation>, InvitationPersistenceError>;

    /// Insert or update an invitation.
    async fn save(&self, invitation: &Invitation) -> Result<(), InvitationPersistenceError>;
}
