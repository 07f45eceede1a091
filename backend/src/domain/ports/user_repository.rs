//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, Role, User, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the insert.
        Duplicate { field: String } => "user repository rejected duplicate {field}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `Duplicate` when the username or email
    /// is already registered.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by normalised username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError>;

    /// All users holding `role`, ordered by username.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError>;
}
