//! Coverage for session settings under both profiles.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;

struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("complaints-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write temporary key");
        Self { path }
    }

    fn path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            eprintln!("leaving temporary key behind: {error}");
        }
    }
}

fn env_of(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

#[fixture]
fn long_key() -> TempKeyFile {
    TempKeyFile::new(SESSION_KEY_MIN_LEN)
}

fn unwrap_err(result: Result<SessionSettings, SessionConfigError>) -> SessionConfigError {
    match result {
        Ok(settings) => panic!("expected rejection, got {settings:?}"),
        Err(error) => error,
    }
}

#[rstest]
fn production_defaults_to_secure_lax(long_key: TempKeyFile) {
    let path = long_key.path();
    let env = env_of(&[(KEY_FILE_ENV, &path)]);
    let settings = session_settings_from_env(&env, Profile::Production).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn production_rejects_insecure_cookie(long_key: TempKeyFile) {
    let path = long_key.path();
    let env = env_of(&[(KEY_FILE_ENV, &path), (COOKIE_SECURE_ENV, "0")]);
    let err = unwrap_err(session_settings_from_env(&env, Profile::Production));
    assert!(matches!(err, SessionConfigError::InsecureCookie));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn production_rejects_unparseable_toggles(
    long_key: TempKeyFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let path = long_key.path();
    let env = env_of(&[(KEY_FILE_ENV, &path), (name, value)]);
    let err = unwrap_err(session_settings_from_env(&env, Profile::Production));
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: reported, .. } if reported == name));
}

#[rstest]
fn production_rejects_ephemeral_keys(long_key: TempKeyFile) {
    let path = long_key.path();
    let env = env_of(&[(KEY_FILE_ENV, &path), (ALLOW_EPHEMERAL_ENV, "yes")]);
    let err = unwrap_err(session_settings_from_env(&env, Profile::Production));
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn production_requires_a_readable_key() {
    let env = env_of(&[(KEY_FILE_ENV, "/nonexistent/complaints/session_key")]);
    let err = unwrap_err(session_settings_from_env(&env, Profile::Production));
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn production_rejects_short_keys() {
    let key = TempKeyFile::new(SESSION_KEY_MIN_LEN - 1);
    let path = key.path();
    let env = env_of(&[(KEY_FILE_ENV, &path)]);
    let err = unwrap_err(session_settings_from_env(&env, Profile::Production));
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 63, min_len: SESSION_KEY_MIN_LEN, .. }
    ));
}

#[rstest]
fn development_falls_back_instead_of_failing() {
    let key = TempKeyFile::new(8);
    let path = key.path();
    let env = env_of(&[
        (KEY_FILE_ENV, &path),
        (COOKIE_SECURE_ENV, "perhaps"),
        (SAMESITE_ENV, "unexpected"),
    ]);
    let settings = session_settings_from_env(&env, Profile::Development).expect("lenient");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn development_honours_explicit_toggles(long_key: TempKeyFile) {
    let path = long_key.path();
    let env = env_of(&[
        (KEY_FILE_ENV, &path),
        (COOKIE_SECURE_ENV, "TRUE"),
        (SAMESITE_ENV, "strict"),
    ]);
    let settings = session_settings_from_env(&env, Profile::Development).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn same_key_file_yields_same_key(long_key: TempKeyFile) {
    let path = long_key.path();
    let first = session_settings_from_env(&env_of(&[(KEY_FILE_ENV, &path)]), Profile::Production)
        .expect("valid settings");
    let second = session_settings_from_env(&env_of(&[(KEY_FILE_ENV, &path)]), Profile::Production)
        .expect("valid settings");
    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
#[case(Some("production"), Profile::Production)]
#[case(Some(" PRODUCTION "), Profile::Production)]
#[case(Some("staging"), Profile::Development)]
#[case(None, Profile::Development)]
fn profile_from_environment(#[case] raw: Option<&str>, #[case] expected: Profile) {
    assert_eq!(Profile::from_environment(raw), expected);
}

#[rstest]
fn debug_output_redacts_the_key(long_key: TempKeyFile) {
    let path = long_key.path();
    let settings = session_settings_from_env(&env_of(&[(KEY_FILE_ENV, &path)]), Profile::Production)
        .expect("valid settings");
    let rendered = format!("{settings:?}");
    assert!(rendered.contains("<redacted>"));
}

#[rstest]
fn process_environment_is_read_through_default_env(long_key: TempKeyFile) {
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(long_key.path())),
        (COOKIE_SECURE_ENV, Some("1".to_owned())),
        (SAMESITE_ENV, Some("strict".to_owned())),
        (ALLOW_EPHEMERAL_ENV, None::<String>),
    ]);

    let settings = session_settings_from_env(&mockable::DefaultEnv::new(), Profile::Production)
        .expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.key.master(), Key::derive_from(&[b'k'; SESSION_KEY_MIN_LEN]).master());
}
