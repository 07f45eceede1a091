//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationRequest, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Validate the form, hash the secret, and store the new user.
    ///
    /// Field violations come back as [`Error::validation`]; a uniqueness
    /// race lost at write time is a conflict.
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error>;
}
