//! Session cookie settings read from the environment.
//!
//! ```text
//! SESSION_KEY_FILE         key material (default /var/run/secrets/session_key)
//! SESSION_COOKIE_SECURE    1|0|true|false|yes|no|y|n
//! SESSION_SAMESITE         Strict|Lax|None (default Lax)
//! SESSION_ALLOW_EPHEMERAL  permit a generated key when the file is missing
//! ```
//!
//! The production profile refuses anything that would weaken the cookie:
//! a short or missing key, an insecure cookie, or an unparseable toggle.
//! The development profile logs a warning and falls back instead.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub(crate) const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key file length accepted in production.
pub const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this.
const DERIVE_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly session settings are validated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    /// `production` (any case) selects [`Profile::Production`]; anything
    /// else is development.
    ///
    /// # Examples
    /// ```
    /// use complaints::inbound::http::session_config::Profile;
    ///
    /// assert_eq!(Profile::from_environment(Some("Production")), Profile::Production);
    /// assert_eq!(Profile::from_environment(None), Profile::Development);
    /// ```
    pub fn from_environment(environment: Option<&str>) -> Self {
        match environment {
            Some(value) if value.trim().eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Signing and encryption key for the private cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .finish()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_COOKIE_SECURE=0 is not allowed in production")]
    InsecureCookie,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in production")]
    EphemeralNotAllowed,
}

/// Read and validate session settings for `profile`.
///
/// # Examples
/// ```
/// use complaints::inbound::http::session_config::{Profile, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, Profile::Development).expect("dev falls back");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    profile: Profile,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure_from_env(env, profile)?;
    let same_site = same_site_from_env(env, profile, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, profile)?;
    let key = session_key_from_env(env, profile, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Development falls back to `default` with a warning; production refuses.
fn lenient<T>(
    profile: Profile,
    default: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if profile.is_production() {
        return Err(error);
    }
    warn!(%error, "session setting ignored; using default");
    Ok(default)
}

fn bool_from_env<E: Env>(
    env: &E,
    name: &'static str,
    profile: Profile,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => lenient(
            profile,
            default,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, profile: Profile) -> Result<bool, SessionConfigError> {
    let secure = bool_from_env(env, COOKIE_SECURE_ENV, profile, profile.is_production())?;
    if profile.is_production() && !secure {
        return Err(SessionConfigError::InsecureCookie);
    }
    Ok(secure)
}

fn same_site_from_env<E: Env>(
    env: &E,
    profile: Profile,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return Ok(SameSite::Lax);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                warn!("SESSION_SAMESITE=None without a secure cookie; browsers will drop it");
            }
            Ok(SameSite::None)
        }
        _ => lenient(
            profile,
            SameSite::Lax,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, profile: Profile) -> Result<bool, SessionConfigError> {
    let allow = bool_from_env(env, ALLOW_EPHEMERAL_ENV, profile, false)?;
    if profile.is_production() && allow {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    Ok(allow)
}

fn session_key_from_env<E: Env>(
    env: &E,
    profile: Profile,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) => {
            if profile.is_production() {
                return Err(SessionConfigError::KeyRead { path, source });
            }
            if !allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "session key unreadable; generating a temporary key (development only)"
                );
            }
            return Ok(Key::generate());
        }
    };

    let length = bytes.len();
    let minimum = if profile.is_production() {
        SESSION_KEY_MIN_LEN
    } else {
        DERIVE_MIN_LEN
    };
    if length < minimum {
        bytes.zeroize();
        let error = SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: minimum,
        };
        return lenient(profile, Key::generate(), error);
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
