//! Invitations sent by organizers to prospective attendees.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Email, EventId, InvitationId};

/// Invalid responses and unknown status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationError {
    /// The invitation was already answered or expired.
    #[error("Invitation has already been answered or has expired")]
    NotPending,
    /// Tokens cannot be empty.
    #[error("Invitation token is required")]
    EmptyToken,
    /// Stored status is not recognised.
    #[error("Unknown invitation status: {value}")]
    UnknownStatus { value: String },
}

/// Response state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    /// Waiting for an answer.
    #[default]
    Pending,
    /// The invitee accepted.
    Accepted,
    /// The invitee declined.
    Declined,
    /// No longer answerable.
    Expired,
}

impl InvitationStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = InvitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(InvitationError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Opaque secret used in invitation links.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvitationToken(String);

impl InvitationToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token received from a client or storage.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, InvitationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvitationError::EmptyToken);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for InvitationToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored representation used to rehydrate an [`Invitation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRecord {
    /// Identifier.
    pub id: InvitationId,
    /// Event the record belongs to.
    pub event_id: EventId,
    /// Invitee email.
    pub email: Email,
    /// Opaque token sent to the invitee.
    pub token: InvitationToken,
    /// Invitation status.
    pub status: InvitationStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// When the invitee answered.
    pub responded_at: Option<DateTime<Utc>>,
}

/// Invitation to an event addressed to an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    id: InvitationId,
    event_id: EventId,
    email: Email,
    token: InvitationToken,
    status: InvitationStatus,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Issue a pending invitation with a fresh token.
    pub fn issue(id: InvitationId, event_id: EventId, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id,
            event_id,
            email,
            token: InvitationToken::generate(),
            status: InvitationStatus::Pending,
            created_at: now,
            responded_at: None,
        }
    }

    /// Rehydrate a stored invitation.
    pub fn restore(record: InvitationRecord) -> Self {
        Self {
            id: record.id,
            event_id: record.event_id,
            email: record.email,
            token: record.token,
            status: record.status,
            created_at: record.created_at,
            responded_at: record.responded_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> InvitationId {
        self.id
    }

    /// Event this belongs to.
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Token sent to the invitee.
    pub fn token(&self) -> &InvitationToken {
        &self.token
    }

    /// Current status.
    pub fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the invitee answered, if they did.
    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Whether the invitation still awaits an answer.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Record acceptance at `now`.
    pub fn accept(&mut self, now: DateTime<Utc>) {
        self.respond(InvitationStatus::Accepted, now);
    }

    /// Record a refusal at `now`.
    pub fn decline(&mut self, now: DateTime<Utc>) {
        self.respond(InvitationStatus::Declined, now);
    }

    /// Mark as expired at `now`.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.respond(InvitationStatus::Expired, now);
    }

    /// Answer a pending invitation; answered invitations are left untouched.
    pub fn answer(&mut self, accept: bool, now: DateTime<Utc>) -> Result<(), InvitationError> {
        if !self.is_pending() {
            return Err(InvitationError::NotPending);
        }
        if accept {
            self.accept(now);
        } else {
            self.decline(now);
        }
        Ok(())
    }

    fn respond(&mut self, status: InvitationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.responded_at = Some(now);
    }
}
