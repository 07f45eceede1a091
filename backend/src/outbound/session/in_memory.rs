//! Process-local [`SessionStore`].
//!
//! Only the SHA-256 digest of each token is kept, so a dump of the store
//! cannot be replayed as cookies. Suitable for a single instance; sessions
//! do not survive a restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::domain::Identity;
use crate::domain::ports::{SESSION_LIFETIME, SessionStore, SessionStoreError, SessionToken};

#[derive(Debug, Clone)]
struct SessionEntry {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// In-memory session store keyed by token digest.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    clock: Arc<dyn Clock>,
    lifetime: TimeDelta,
}

impl InMemorySessionStore {
    /// Store whose sessions last [`SESSION_LIFETIME`].
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_lifetime(clock, SESSION_LIFETIME)
    }

    /// Store with a custom session lifetime.
    pub fn with_lifetime(clock: Arc<dyn Clock>, lifetime: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            clock,
            lifetime: TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Number of sessions held, expired ones included until next access.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn digest(token: &SessionToken) -> String {
    hex::encode(Sha256::digest(token.as_str().as_bytes()))
}

fn storage_error<T>(_: std::sync::PoisonError<T>) -> SessionStoreError {
    SessionStoreError::storage("session lock poisoned")
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn bind(&self, identity: &Identity) -> Result<SessionToken, SessionStoreError> {
        let mut bytes = [0_u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|err| SessionStoreError::token_generation(err.to_string()))?;
        let token = SessionToken::from_bytes(&bytes);

        let now = self.clock.utc();
        let entry = SessionEntry {
            identity: identity.clone(),
            expires_at: now.checked_add_signed(self.lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        let mut sessions = self.sessions.write().map_err(storage_error)?;
        sessions.retain(|_, existing| existing.expires_at > now);
        sessions.insert(digest(&token), entry);
        Ok(token)
    }

    async fn restore(&self, token: &SessionToken) -> Result<Option<Identity>, SessionStoreError> {
        let key = digest(token);
        let now = self.clock.utc();
        let mut sessions = self.sessions.write().map_err(storage_error)?;
        match sessions.get(&key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.identity.clone())),
            Some(_) => {
                sessions.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn invalidate(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .map_err(storage_error)?
            .remove(&digest(token));
        Ok(())
    }
}
