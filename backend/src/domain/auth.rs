//! Authentication primitives: login credentials, session identities, and
//! registration requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::error::Error;
use super::user::{
    DisplayName, EmailAddress, PlainSecret, Role, Secret, UserDraft, UserId, Username,
};
use super::validation::FieldErrors;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Message shown when a restored identity lacks the role a page needs.
pub const NOT_AUTHORISED_MESSAGE: &str = "You are not authorised to view that page";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is normalised the same way [`Username`] is.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use complaints::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Alice ", "secret").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username =
            Username::new(username).map_err(|_| LoginValidationError::EmptyUsername)?;

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    username: Username,
    role: Role,
}

impl Identity {
    pub fn new(user_id: UserId, username: Username, role: Role) -> Self {
        Self {
            user_id,
            username,
            role,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Fail closed unless this identity holds `role`.
    ///
    /// # Examples
    /// ```
    /// use complaints::domain::{ErrorCode, Identity, Role, UserId, Username};
    ///
    /// let bob = Identity::new(UserId::random(), Username::new("bob").unwrap(), Role::Engineer);
    /// assert!(bob.require_role(Role::Engineer).is_ok());
    /// let err = bob.require_role(Role::Admin).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Unauthorized);
    /// ```
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::unauthorized(NOT_AUTHORISED_MESSAGE))
        }
    }
}

/// Whether the submitted username and email are still free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Availability {
    pub username_taken: bool,
    pub email_taken: bool,
}

/// Raw registration form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub password2: Zeroizing<String>,
    pub role: String,
}

impl RegistrationRequest {
    /// Normalised username, when the submitted value is usable at all.
    pub fn normalised_username(&self) -> Option<Username> {
        Username::new(&self.username).ok()
    }

    /// Normalised email, when the submitted value is a valid address.
    pub fn normalised_email(&self) -> Option<EmailAddress> {
        EmailAddress::new(&self.email).ok()
    }

    /// Check every field and report all violations together.
    pub fn validate(&self, availability: Availability) -> Result<UserDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let display_name = DisplayName::new(&self.name).ok();
        if display_name.is_none() {
            errors.push("name", "Name is required");
        }

        let email = self.normalised_email();
        match email {
            None => errors.push("email", "Valid email is required"),
            Some(_) if availability.email_taken => errors.push("email", "Email already in use"),
            Some(_) => {}
        }

        let username = self.normalised_username();
        match username {
            None => errors.push("username", "Username is required"),
            Some(_) if availability.username_taken => {
                errors.push("username", "Username already in use");
            }
            Some(_) => {}
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if self.password != self.password2 {
            errors.push("password2", "Passwords do not match");
        }

        let role = if self.role.trim().is_empty() {
            errors.push("role", "Role is required");
            None
        } else {
            let parsed = self.role.parse::<Role>().ok();
            if parsed.is_none() {
                errors.push("role", "Role must be one of user, engineer, admin");
            }
            parsed
        };

        match (display_name, email, username, role) {
            (Some(display_name), Some(email), Some(username), Some(role)) if errors.is_empty() => {
                Ok(UserDraft::new(
                    username,
                    email,
                    display_name,
                    role,
                    Secret::Plain(PlainSecret::new(self.password.as_str())),
                ))
            }
            _ => Err(errors),
        }
    }
}
