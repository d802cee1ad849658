//! User accounts: organizers publish events, attendees buy tickets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Email, UserId};

/// Minimum number of characters in a user name.
pub const USER_NAME_MIN: usize = 2;
/// Maximum number of characters in a user name.
pub const USER_NAME_MAX: usize = 100;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The name is shorter than [`USER_NAME_MIN`] once trimmed.
    #[error("Name must be at least {min} characters")]
    NameTooShort { min: usize },
    /// The name is longer than [`USER_NAME_MAX`].
    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// The user type is neither organizer nor attendee.
    #[error("Unknown user type: {value}")]
    UnknownType { value: String },
}

/// Role of a user within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// May create and publish events and withdraw their balance.
    Organizer,
    /// Buys tickets.
    #[default]
    Attendee,
}

impl UserType {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organizer => "ORGANIZER",
            Self::Attendee => "ATTENDEE",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ORGANIZER" => Ok(Self::Organizer),
            "ATTENDEE" => Ok(Self::Attendee),
            _ => Err(UserValidationError::UnknownType {
                value: s.to_owned(),
            }),
        }
    }
}

/// Trimmed display name of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a name.
    ///
    /// # Examples
    /// ```
    /// use ticketing::domain::UserName;
    ///
    /// assert_eq!(UserName::new("  Ada ").unwrap().as_ref(), "Ada");
    /// assert!(UserName::new(" A ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < USER_NAME_MIN {
            return Err(UserValidationError::NameTooShort {
                min: USER_NAME_MIN,
            });
        }
        if length > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered user.
///
/// Password hashes are deliberately not part of this type; they are only
/// handled by the account repository and the password hasher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    user_type: UserType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user registered at `now`.
    pub fn new(
        id: UserId,
        name: UserName,
        email: Email,
        user_type: UserType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            user_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a stored user.
    pub fn restore(
        id: UserId,
        name: UserName,
        email: Email,
        user_type: UserType,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            user_type,
            created_at,
            updated_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Organizer or attendee.
    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the user may organise events.
    pub fn is_organizer(&self) -> bool {
        self.user_type == UserType::Organizer
    }

    /// Whether the user is a ticket buyer.
    pub fn is_attendee(&self) -> bool {
        self.user_type == UserType::Attendee
    }
}
