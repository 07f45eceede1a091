//! Account domain service: login and registration.
//!
//! Password hashing is CPU bound, so every call into the [`SecretHasher`]
//! runs on tokio's blocking pool instead of an async worker.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::ports::{
    INVALID_CREDENTIALS_MESSAGE, LoginService, RegistrationService, SecretHashError,
    SecretHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Availability, Error, Identity, LoginCredentials, RegistrationRequest, User,
};

/// Service implementing [`LoginService`] and [`RegistrationService`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict("Registration failed").with_details(json!({ "field": field }))
        }
    }
}

fn map_hash_error(error: SecretHashError) -> Error {
    Error::internal(error.to_string())
}

async fn run_blocking<F, T>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| Error::internal(format!("blocking task failed: {err}")))
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: SecretHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?;

        let hasher = Arc::clone(&self.hasher);
        let candidate = Zeroizing::new(credentials.password().to_owned());
        let identity = match user {
            Some(user) => {
                let hash = user.secret().clone();
                let matches = run_blocking(move || hasher.verify(candidate.as_str(), &hash))
                    .await?
                    .map_err(map_hash_error)?;
                matches.then(|| user.identity())
            }
            None => {
                run_blocking(move || hasher.verify_dummy(candidate.as_str())).await?;
                None
            }
        };

        identity.ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS_MESSAGE))
    }
}

#[async_trait]
impl<U, H> RegistrationService for AccountService<U, H>
where
    U: UserRepository,
    H: SecretHasher + 'static,
{
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error> {
        let username_taken = match request.normalised_username() {
            Some(username) => self
                .users
                .username_exists(&username)
                .await
                .map_err(map_user_error)?,
            None => false,
        };
        let email_taken = match request.normalised_email() {
            Some(email) => self
                .users
                .email_exists(&email)
                .await
                .map_err(map_user_error)?,
            None => false,
        };

        let draft = request
            .validate(Availability {
                username_taken,
                email_taken,
            })
            .map_err(Error::validation)?;

        let hasher = Arc::clone(&self.hasher);
        let created_at = self.clock.utc();
        let user = run_blocking(move || draft.prepare_for_write(hasher.as_ref(), created_at))
            .await?
            .map_err(map_hash_error)?;

        self.users.insert(&user).await.map_err(map_user_error)?;
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
