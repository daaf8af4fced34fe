//! Server settings loaded via OrthoConfig, plus the assembled runtime config.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use actix_web::cookie::{Key, SameSite};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crm::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};
use crm::outbound::persistence::{DEFAULT_MAX_SIZE, DbPool, PoolConfig};

const DEFAULT_PORT: u16 = 8080;

/// Process-level settings read from `CRM_*` variables, config files and CLI
/// arguments.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CRM")]
pub struct ServerSettings {
    /// Interface to listen on.
    pub host: Option<IpAddr>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub db_pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving. Defaults to on.
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url.clone())
            .with_max_size(self.db_pool_max_size.unwrap_or(DEFAULT_MAX_SIZE))
    }
}

/// Session cookie settings from the process environment.
///
/// # Errors
/// Returns [`SessionConfigError`] when a variable is invalid or, in release
/// builds, missing.
pub fn session_settings(mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
    session_settings_from_env(&DefaultEnv::new(), mode)
}

/// Everything `create_server` needs: cookie settings, listener address and
/// the database pool backing every repository.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "CRM_HOST",
        "CRM_PORT",
        "CRM_DATABASE_URL",
        "CRM_DB_POOL_MAX_SIZE",
        "CRM_RUN_MIGRATIONS",
    ];

    fn load() -> Result<ServerSettings, String> {
        ServerSettings::load_from_iter([OsString::from("crm")]).map_err(|err| err.to_string())
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_only_the_database_url_is_set() {
        let _guard = lock_env(env_with(&[("CRM_DATABASE_URL", "postgres://crm@db/crm")]));

        let settings = load().expect("settings should load");
        assert_eq!(settings.database_url, "postgres://crm@db/crm");
        assert!(settings.run_migrations());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.pool_config().max_size(), DEFAULT_MAX_SIZE);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("CRM_DATABASE_URL", "postgres://crm@db/crm"),
            ("CRM_HOST", "127.0.0.1"),
            ("CRM_PORT", "9000"),
            ("CRM_DB_POOL_MAX_SIZE", "3"),
            ("CRM_RUN_MIGRATIONS", "false"),
        ]));

        let settings = load().expect("settings should load");
        assert!(!settings.run_migrations());
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(settings.pool_config().max_size(), 3);
    }

    #[rstest]
    fn migrations_can_be_requested_explicitly() {
        let _guard = lock_env(env_with(&[
            ("CRM_DATABASE_URL", "postgres://crm@db/crm"),
            ("CRM_RUN_MIGRATIONS", "true"),
        ]));
        assert!(load().expect("settings should load").run_migrations());
    }

    #[rstest]
    fn session_settings_read_the_process_environment() {
        let _guard = lock_env([
            ("SESSION_KEY_FILE", Some("/nonexistent/crm/session_key")),
            ("SESSION_COOKIE_SECURE", Some("0")),
            ("SESSION_SAMESITE", Some("Strict")),
            ("SESSION_ALLOW_EPHEMERAL", None),
        ]);

        let settings = session_settings(BuildMode::Debug)
            .unwrap_or_else(|err| panic!("debug settings should load: {err}"));
        assert!(!settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn release_builds_reject_a_missing_session_key() {
        let _guard = lock_env([
            ("SESSION_KEY_FILE", Some("/nonexistent/crm/session_key")),
            ("SESSION_COOKIE_SECURE", Some("1")),
            ("SESSION_SAMESITE", Some("Strict")),
            ("SESSION_ALLOW_EPHEMERAL", Some("0")),
        ]);

        assert!(matches!(
            session_settings(BuildMode::Release),
            Err(SessionConfigError::KeyRead { .. })
        ));
    }

    #[rstest]
    fn a_missing_database_url_is_an_error() {
        let _guard = lock_env(env_with(&[]));
        assert!(load().is_err());
    }
}
