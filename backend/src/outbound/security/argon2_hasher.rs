//! Argon2id implementation of [`SecretHasher`].
//!
//! Hashes are stored as PHC strings, which embed the algorithm, parameters,
//! and salt. Verification reads the parameters back from the stored string,
//! so changing the work factor only affects new hashes.

use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use password_hash::SaltString;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::debug;

use crate::domain::ports::{SecretHashError, SecretHasher};
use crate::domain::{PlainSecret, SecretHash};

/// Memory cost in KiB for production hashing.
pub const PRODUCTION_MEMORY_KIB: u32 = 19 * 1024;
/// Iteration count for production hashing.
pub const PRODUCTION_ITERATIONS: u32 = 2;

const SALT_LEN: usize = 16;
const DUMMY_SECRET: &str = "complaint-desk-dummy-secret";

/// Argon2id hasher with fixed parameters.
///
/// # Examples
/// ```
/// use complaints::domain::PlainSecret;
/// use complaints::domain::ports::SecretHasher;
/// use complaints::outbound::security::Argon2SecretHasher;
///
/// let hasher = Argon2SecretHasher::with_params(8, 1, 1).expect("valid params");
/// let hash = hasher.hash(&PlainSecret::new("hunter22")).expect("hash");
/// assert!(hasher.verify("hunter22", &hash).expect("verify"));
/// ```
pub struct Argon2SecretHasher {
    argon2: Argon2<'static>,
    dummy: SecretHash,
}

impl Argon2SecretHasher {
    /// Hasher tuned for production: 19 MiB memory, 2 passes, 1 lane.
    pub fn production() -> Result<Self, SecretHashError> {
        Self::with_params(PRODUCTION_MEMORY_KIB, PRODUCTION_ITERATIONS, 1)
    }

    /// Hasher with explicit Argon2id cost parameters.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, SecretHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| SecretHashError::hash(format!("invalid argon2 params: {err}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy = hash_with(&argon2, DUMMY_SECRET)?;
        Ok(Self { argon2, dummy })
    }
}

fn hash_with(argon2: &Argon2<'_>, secret: &str) -> Result<SecretHash, SecretHashError> {
    let mut salt_bytes = [0_u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|err| SecretHashError::hash(format!("salt generation failed: {err}")))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| SecretHashError::hash(format!("salt encoding failed: {err}")))?;
    let phc = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| SecretHashError::hash(err.to_string()))?;
    Ok(SecretHash::from_phc(phc.to_string()))
}

impl SecretHasher for Argon2SecretHasher {
    fn hash(&self, secret: &PlainSecret) -> Result<SecretHash, SecretHashError> {
        hash_with(&self.argon2, secret.expose())
    }

    fn verify(&self, candidate: &str, hash: &SecretHash) -> Result<bool, SecretHashError> {
        let parsed = PasswordHash::new(hash.as_phc())
            .map_err(|err| SecretHashError::verify(format!("stored hash unreadable: {err}")))?;
        match self.argon2.verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(SecretHashError::verify(err.to_string())),
        }
    }

    fn verify_dummy(&self, candidate: &str) {
        if let Err(error) = self.verify(candidate, &self.dummy) {
            debug!(%error, "dummy verification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2SecretHasher {
        Argon2SecretHasher::with_params(8, 1, 1).expect("cheap params")
    }

    #[rstest]
    fn hash_is_salted_phc(hasher: Argon2SecretHasher) {
        let first = hasher.hash(&PlainSecret::new("hunter22")).expect("hash");
        let second = hasher.hash(&PlainSecret::new("hunter22")).expect("hash");

        assert!(first.as_phc().starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("hunter22", true)]
    #[case("hunter23", false)]
    #[case("", false)]
    fn verify_compares_against_hash(
        hasher: Argon2SecretHasher,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let hash = hasher.hash(&PlainSecret::new("hunter22")).expect("hash");
        assert_eq!(hasher.verify(candidate, &hash).expect("verify"), expected);
    }

    #[rstest]
    fn verify_rejects_corrupt_hash(hasher: Argon2SecretHasher) {
        let err = hasher
            .verify("hunter22", &SecretHash::from_phc("not-a-phc-string"))
            .expect_err("corrupt hash");
        assert!(matches!(err, SecretHashError::Verify { .. }));
    }

    #[rstest]
    fn invalid_params_are_reported() {
        assert!(Argon2SecretHasher::with_params(0, 0, 0).is_err());
    }
}
