//! Invite someone to an event by email.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{EventRepository, InvitationRepository};
use crate::domain::service_support::{
    map_event_repository_error, map_invitation_repository_error,
};
use crate::domain::{Email, Error, EventId, Invitation, InvitationId};

/// Invitation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteUserToEventInput {
    /// Event to invite to.
    pub event_id: EventId,
    /// Invitee email.
    pub email: Email,
}

/// Issues pending invitations with fresh link tokens.
pub struct InviteUserToEvent<E, I> {
    events: Arc<E>,
    invitations: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<E, I> InviteUserToEvent<E, I> {
    /// Use case over the event and invitation repositories.
    pub fn new(events: Arc<E>, invitations: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            invitations,
            clock,
        }
    }
}

impl<E, I> InviteUserToEvent<E, I>
where
    E: EventRepository,
    I: InvitationRepository,
{
    /// Invite `input.email` to the event.
    pub async fn execute(&self, input: InviteUserToEventInput) -> Result<Invitation, Error> {
        let event = self
            .events
            .find_by_id(&input.event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))?;
        let invitation = Invitation::issue(
            InvitationId::random(),
            event.id(),
            input.email,
            self.clock.utc(),
        );
        self.invitations
            .save(&invitation)
            .await
            .map_err(map_invitation_repository_error)?;
        info!(invitation_id = %invitation.id(), event_id = %event.id(), "invitation issued");
        Ok(invitation)
    }
}
