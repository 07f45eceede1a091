//! Port for one-way password hashing.
//!
//! Implementations are CPU bound and synchronous; async callers run them on
//! the blocking pool.

use crate::domain::{PlainSecret, SecretHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing or verifying secrets.
    pub enum SecretHashError {
        /// A new hash could not be produced.
        Hash { message: String } => "secret hashing failed: {message}",
        /// A stored hash could not be parsed or checked.
        Verify { message: String } => "secret verification failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait SecretHasher: Send + Sync {
    /// Hash `secret` with a fresh salt.
    fn hash(&self, secret: &PlainSecret) -> Result<SecretHash, SecretHashError>;

    /// Check `candidate` against `hash`; a mismatch is `Ok(false)`.
    fn verify(&self, candidate: &str, hash: &SecretHash) -> Result<bool, SecretHashError>;

    /// Spend the same effort as [`SecretHasher::verify`] without a stored
    /// hash, so unknown usernames are not distinguishable by timing.
    fn verify_dummy(&self, candidate: &str);
}
