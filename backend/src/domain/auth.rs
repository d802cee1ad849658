//! Authentication primitives: passwords, login credentials, and registrations.
//!
//! Inbound adapters build these from raw payloads before calling the account
//! port, so services only ever see validated values.

use zeroize::Zeroizing;

use super::{Email, UserName, UserType};

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Validation errors for credentials and registrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    /// The email is malformed.
    #[error("Invalid email address")]
    InvalidEmail,
    /// The password is shorter than `min`.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// No password was given.
    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Plain-text password held in zeroising memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password, e.g. for login attempts.
    pub fn any(raw: &str) -> Result<Self, CredentialsError> {
        if raw.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Accept a password strong enough for a new account.
    pub fn new_secret(raw: &str) -> Result<Self, CredentialsError> {
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(CredentialsError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret to a password hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Encoded password hash as stored alongside a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use ticketing::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email and password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = Email::new(email).map_err(|_| CredentialsError::InvalidEmail)?;
        let password = Password::any(password)?;
        Ok(Self { email, password })
    }

    /// Login email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Offered password.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Validated display name.
    pub name: UserName,
    /// Login email.
    pub email: Email,
    /// Validated password.
    pub password: Password,
    /// Account type.
    pub user_type: UserType,
}
