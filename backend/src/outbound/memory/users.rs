//! In-memory [`UserRepository`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Role, User, UserId, Username};

use super::{ReadResult, WriteResult, poisoned};

/// User store keyed by id. Username and email uniqueness is enforced on
/// insert, mirroring the unique indexes of the SQL schema.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().map(|held| held.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> ReadResult<'_, HashMap<UserId, User>> {
        self.users.read().map_err(poisoned)
    }

    fn write(&self) -> WriteResult<'_, HashMap<UserId, User>> {
        self.users.write().map_err(poisoned)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.write().map_err(UserPersistenceError::query)?;
        if users.values().any(|existing| existing.username() == user.username()) {
            return Err(UserPersistenceError::duplicate("username"));
        }
        if users.values().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate("email"));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.read().map_err(UserPersistenceError::query)?;
        Ok(users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let users = self.read().map_err(UserPersistenceError::query)?;
        Ok(users.values().any(|user| user.username() == username))
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        let users = self.read().map_err(UserPersistenceError::query)?;
        Ok(users.values().any(|user| user.email() == email))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.read().map_err(UserPersistenceError::query)?;
        let mut matching: Vec<User> = users
            .values()
            .filter(|user| user.role() == role)
            .cloned()
            .collect();
        matching.sort_by(|left, right| left.username().cmp(right.username()));
        Ok(matching)
    }
}
