//! Driving ports for event invitations.
use async_trait::async_trait;

use crate::domain::{Email, Error, EventId, Invitation, InvitationToken, UserId};

/// Request from an organizer to invite someone to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteRequest {
    /// Organizer sending the invitation.
    pub organizer_id: UserId,
    /// Event to invite to.
    pub event_id: EventId,
    /// Invitee email.
    pub email: Email,
}

/// Answer to a pending invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationResponse {
    /// Token from the invitation.
    pub token: InvitationToken,
    /// Signed-in user answering.
    pub user_id: UserId,
    /// `true` to accept, `false` to decline.
    pub accept: bool,
}

/// Driving port for invitation changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationCommand: Send + Sync {
    /// Invite an email address to an organizer's event.
    async fn invite(&self, request: InviteRequest) -> Result<Invitation, Error>;

    /// Accept or decline a pending invitation.
    async fn respond(&self, response: InvitationResponse) -> Result<Invitation, Error>;
}

/// Driving port for invitation reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationQuery: Send + Sync {
    /// Fetch an invitation by its token.
    async fn get_by_token(&self, token: &InvitationToken) -> Result<Invitation, Error>;

    /// Invitations of an event, visible to its organizer only.
    async fn list_for_event(
        &self,
        organizer_id: UserId,
        event_id: EventId,
    ) -> Result<Vec<Invitation>, Error>;
}
