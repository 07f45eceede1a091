//! Process settings loaded via OrthoConfig.
//!
//! Sources, lowest precedence first: defaults, configuration file,
//! `COMPLAINTS_*` environment variables, command-line flags.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::Profile;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Where to listen, which profile to run, and which store to use.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMPLAINTS")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 3000)]
    pub port: u16,
    /// `production` enables the strict session profile.
    pub environment: Option<String>,
    /// PostgreSQL URL; without one the stores live in memory.
    pub database_url: Option<String>,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn profile(&self) -> Profile {
        Profile::from_environment(self.environment.as_deref())
    }

    /// Socket address to bind, or `None` when `host` is not an IP literal.
    pub fn bind_addr(&self) -> Option<SocketAddr> {
        format!("{}:{}", self.host(), self.port).parse().ok()
    }

    /// Blank URLs count as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            environment: None,
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "COMPLAINTS_HOST",
        "COMPLAINTS_PORT",
        "COMPLAINTS_ENVIRONMENT",
        "COMPLAINTS_DATABASE_URL",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("complaints")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.profile(), Profile::Development);
        assert!(settings.database_url().is_none());
        assert_eq!(settings.bind_addr(), "0.0.0.0:3000".parse().ok());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("COMPLAINTS_HOST", Some("127.0.0.1".to_owned())),
            ("COMPLAINTS_PORT", Some("8081".to_owned())),
            ("COMPLAINTS_ENVIRONMENT", Some("production".to_owned())),
            (
                "COMPLAINTS_DATABASE_URL",
                Some("postgres://desk@localhost/complaints".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:8081".parse().ok());
        assert_eq!(settings.profile(), Profile::Production);
        assert_eq!(
            settings.database_url(),
            Some("postgres://desk@localhost/complaints")
        );
    }

    #[rstest]
    fn blank_database_url_means_memory() {
        let settings = AppSettings {
            database_url: Some("   ".to_owned()),
            ..AppSettings::default()
        };
        assert!(settings.database_url().is_none());
    }
}
