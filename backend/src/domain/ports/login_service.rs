//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so HTTP handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoginCredentials};

/// Message returned for unknown usernames and wrong passwords alike.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the identity to bind to a session.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error>;
}
