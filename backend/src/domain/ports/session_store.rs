//! Port binding session tokens to authenticated identities.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Identity;

use super::define_port_error;

/// How long a bound session stays valid.
pub const SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

const TOKEN_HEX_LEN: usize = 64;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// No randomness was available to mint a token.
        TokenGeneration { message: String } => "session token generation failed: {message}",
        /// Backing storage failed.
        Storage { message: String } => "session storage failed: {message}",
    }
}

/// Opaque bearer token: 256 random bits, hex encoded.
///
/// # Examples
/// ```
/// use complaints::domain::ports::SessionToken;
///
/// assert!(SessionToken::parse("not hex").is_none());
/// assert!(SessionToken::parse(&"ab".repeat(32)).is_some());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Accept a token read back from a client; anything that is not 64 hex
    /// characters is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed =
            raw.len() == TOKEN_HEX_LEN && raw.bytes().all(|byte| byte.is_ascii_hexdigit());
        well_formed.then(|| Self(raw.to_ascii_lowercase()))
    }

    /// Encode freshly generated random bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `identity`, valid for [`SESSION_LIFETIME`].
    async fn bind(&self, identity: &Identity) -> Result<SessionToken, SessionStoreError>;

    /// Identity bound to `token`, or `None` when the token is unknown,
    /// expired, or invalidated.
    async fn restore(&self, token: &SessionToken) -> Result<Option<Identity>, SessionStoreError>;

    /// End the session. Unknown tokens are ignored.
    async fn invalidate(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case(&"zz".repeat(32))]
    #[case(&"a".repeat(65))]
    fn malformed_tokens_are_rejected(#[case] raw: &str) {
        assert!(SessionToken::parse(raw).is_none());
    }

    #[rstest]
    fn parse_normalises_case() {
        let token = SessionToken::parse(&"AB".repeat(32)).expect("valid token");
        assert_eq!(token.as_str(), "ab".repeat(32));
    }

    #[rstest]
    fn debug_output_hides_token() {
        let token = SessionToken::from_bytes(&[7; 32]);
        assert!(!format!("{token:?}").contains("07"));
    }
}
