//! Invitation service implementing invitation driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    EventRepository, InvitationCommand, InvitationQuery, InvitationRepository,
    InvitationResponse, InviteRequest,
};
use crate::domain::service_support::{
    map_event_repository_error, map_invitation_error, map_invitation_repository_error,
};
use crate::domain::use_cases::{InviteUserToEvent, InviteUserToEventInput};
use crate::domain::{Error, EventId, Invitation, InvitationToken, UserId};

/// Invitation management over event and invitation repositories.
pub struct InvitationService<E, I> {
    events: Arc<E>,
    invitations: Arc<I>,
    invite_user: InviteUserToEvent<E, I>,
    clock: Arc<dyn Clock>,
}

impl<E, I> InvitationService<E, I> {
    /// Create a new invitation service.
    pub fn new(events: Arc<E>, invitations: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            invite_user: InviteUserToEvent::new(
                Arc::clone(&events),
                Arc::clone(&invitations),
                Arc::clone(&clock),
            ),
            events,
            invitations,
            clock,
        }
    }
}

impl<E, I> InvitationService<E, I>
where
    E: EventRepository,
    I: InvitationRepository,
{
    async fn ensure_organizer(
        &self,
        event_id: &EventId,
        organizer_id: UserId,
    ) -> Result<(), Error> {
        let event = self
            .events
            .find_by_id(event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))?;
        if event.is_organized_by(organizer_id) {
            Ok(())
        } else {
            Err(Error::forbidden(
                "Only the organizer can manage invitations for this event",
            ))
        }
    }

    async fn load(&self, token: &InvitationToken) -> Result<Invitation, Error> {
        self.invitations
            .find_by_token(token)
            .await
            .map_err(map_invitation_repository_error)?
            .ok_or_else(|| Error::not_found("Invitation not found"))
    }
}

#[async_trait]
impl<E, I> InvitationCommand for InvitationService<E, I>
where
    E: EventRepository,
    I: InvitationRepository,
{
    async fn invite(&self, request: InviteRequest) -> Result<Invitation, Error> {
        self.ensure_organizer(&request.event_id, request.organizer_id)
            .await?;
        self.invite_user
            .execute(InviteUserToEventInput {
                event_id: request.event_id,
                email: request.email,
            })
            .await
    }

    async fn respond(&self, response: InvitationResponse) -> Result<Invitation, Error> {
        let mut invitation = self.load(&response.token).await?;
        invitation
            .answer(response.accept, self.clock.utc())
            .map_err(map_invitation_error)?;
        self.invitations
            .save(&invitation)
            .await
            .map_err(map_invitation_repository_error)?;
        info!(
            invitation_id = %invitation.id(),
            user_id = %response.user_id,
            status = %invitation.status(),
            "invitation answered"
        );
        Ok(invitation)
    }
}

#[async_trait]
impl<E, I> InvitationQuery for InvitationService<E, I>
where
    E: EventRepository,
    I: InvitationRepository,
{
    async fn get_by_token(&self, token: &InvitationToken) -> Result<Invitation, Error> {
        self.load(token).await
    }

    async fn list_for_event(
        &self,
        organizer_id: UserId,
        event_id: EventId,
    ) -> Result<Vec<Invitation>, Error> {
        self.ensure_organizer(&event_id, organizer_id).await?;
        self.invitations
            .find_by_event_id(&event_id)
            .await
            .map_err(map_invitation_repository_error)
    }
}
