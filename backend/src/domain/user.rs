//! User data model.
//!
//! Users are created once at registration and never updated. The secret is
//! hashed before a [`User`] can exist, so every value of that type carries a
//! [`SecretHash`] and never a plaintext password.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::auth::Identity;
use super::ports::{SecretHashError, SecretHasher};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyUsername,
    InvalidEmail,
    EmptyDisplayName,
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login handle, unique across users.
///
/// Usernames are compared case-insensitively, so the constructor trims and
/// lower-cases its input.
///
/// # Examples
/// ```
/// use complaints::domain::Username;
///
/// let name = Username::new("  Alice ").expect("valid username");
/// assert_eq!(name.as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Normalise and validate a username.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Contact email address, unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name shown on dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]; surrounding whitespace is
    /// dropped.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access role granted at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Engineer,
    Admin,
}

impl Role {
    /// Every role, in the order forms present them.
    pub const ALL: [Self; 3] = [Self::User, Self::Engineer, Self::Admin];

    /// Canonical lower-case token, as stored and submitted by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Engineer => "engineer",
            Self::Admin => "admin",
        }
    }

    /// Landing page for a freshly authenticated user of this role.
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Engineer => "/jeng",
            Self::User => "/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    /// Parse a role token; `jeng` is the legacy spelling of `engineer`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "engineer" | "jeng" => Ok(Self::Engineer),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole {
                value: s.to_owned(),
            }),
        }
    }
}

/// PHC-formatted password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Wrap an already computed PHC string.
    pub fn from_phc(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// PHC string for persistence and verification.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash(<redacted>)")
    }
}

/// Plaintext password held only until it is hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainSecret(Zeroizing<String>);

impl PlainSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainSecret(<redacted>)")
    }
}

/// Secret carried by a [`UserDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secret {
    /// Supplied by the user and not yet hashed.
    Plain(PlainSecret),
    /// Hashed already; writes store it unchanged.
    Hashed(SecretHash),
}

/// Persisted application user.
///
/// ## Invariants
/// - `username` and `email` are normalised and unique across users.
/// - `secret` is always a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    display_name: DisplayName,
    role: Role,
    secret: SecretHash,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated components, typically when loading
    /// a stored row.
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        display_name: DisplayName,
        role: Role,
        secret: SecretHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            display_name,
            role,
            secret,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn secret(&self) -> &SecretHash {
        &self.secret
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Session identity for this user.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.username.clone(), self.role)
    }
}

/// Validated registration data awaiting its pre-write hashing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    username: Username,
    email: EmailAddress,
    display_name: DisplayName,
    role: Role,
    secret: Secret,
}

impl UserDraft {
    pub fn new(
        username: Username,
        email: EmailAddress,
        display_name: DisplayName,
        role: Role,
        secret: Secret,
    ) -> Self {
        Self {
            username,
            email,
            display_name,
            role,
            secret,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Hash a plaintext secret and produce the [`User`] to persist.
    ///
    /// A secret that is already [`Secret::Hashed`] is kept as is, so running
    /// the step on a draft rebuilt from stored data never double-hashes.
    pub fn prepare_for_write(
        self,
        hasher: &dyn SecretHasher,
        created_at: DateTime<Utc>,
    ) -> Result<User, SecretHashError> {
        let secret = match self.secret {
            Secret::Plain(plain) => hasher.hash(&plain)?,
            Secret::Hashed(hash) => hash,
        };
        Ok(User::new(
            UserId::random(),
            self.username,
            self.email,
            self.display_name,
            self.role,
            secret,
            created_at,
        ))
    }
}
