//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a local development server
//! against `registration.sqlite` in the working directory.
//!
//! - `REGISTRATION_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, default: `sqlite://registration.sqlite`)
//! - `REGISTRATION_HOST` - Bind address (default: 127.0.0.1)
//! - `REGISTRATION_PORT` - Listen port (default: 5000)
//! - `REGISTRATION_BASE_URL` - Public URL (default: `http://localhost:5000`)
//! - `REGISTRATION_CSRF_ENABLED` - Check CSRF tokens on form posts (default: true)
//! - `REGISTRATION_SQL_ECHO` - Log every SQL statement under the `sqlx::query`
//!   target (default: false)
//! - `REGISTRATION_SEED_ON_STARTUP` - Create tables and seed reference data
//!   before serving (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://registration.sqlite";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Registration site configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Whether form posts must carry a valid CSRF token
    pub csrf_enabled: bool,
    /// Whether to log every SQL statement
    pub sql_echo: bool,
    /// Whether to create tables and seed reference data at startup
    pub seed_on_startup: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("REGISTRATION_DATABASE_URL")
            .or_else(|| get("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host = get("REGISTRATION_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("REGISTRATION_HOST".to_string(), e.to_string())
            })?;
        let port = get("REGISTRATION_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("REGISTRATION_PORT".to_string(), e.to_string())
            })?;
        let base_url = get("REGISTRATION_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let csrf_enabled = get_bool(&get, "REGISTRATION_CSRF_ENABLED", true)?;
        let sql_echo = get_bool(&get, "REGISTRATION_SQL_ECHO", false)?;
        let seed_on_startup = get_bool(&get, "REGISTRATION_SEED_ON_STARTUP", true)?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            csrf_enabled,
            sql_echo,
            seed_on_startup,
            sentry_dsn: get("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for a given database with every other setting at its default.
    ///
    /// Used by tests that build the app in-process.
    #[must_use]
    pub fn for_database(database_url: &str) -> Self {
        Self {
            database_url: SecretString::from(database_url.to_owned()),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            csrf_enabled: true,
            sql_echo: false,
            seed_on_startup: true,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read a boolean flag, falling back to `default` when unset.
fn get_bool<F>(get: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => parse_bool(&raw).ok_or_else(|| {
            ConfigError::InvalidEnvVar(key.to_string(), format!("not a boolean: {raw:?}"))
        }),
    }
}

/// Parse the usual spellings of a boolean flag.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config.database_url.expose_secret(),
            "sqlite://registration.sqlite"
        );
        assert_eq!(config.port, 5000);
        assert_eq!(config.base_url, "http://localhost:5000");
        assert!(config.csrf_enabled);
        assert!(!config.sql_echo);
        assert!(config.seed_on_startup);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = config_from(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite::memory:");

        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("REGISTRATION_DATABASE_URL", "sqlite://primary.sqlite"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.expose_secret(),
            "sqlite://primary.sqlite"
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("REGISTRATION_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "REGISTRATION_PORT"));
    }

    #[test]
    fn test_boolean_flags() {
        let config = config_from(&[
            ("REGISTRATION_CSRF_ENABLED", "off"),
            ("REGISTRATION_SQL_ECHO", "YES"),
            ("REGISTRATION_SEED_ON_STARTUP", "0"),
        ])
        .unwrap();
        assert!(!config.csrf_enabled);
        assert!(config.sql_echo);
        assert!(!config.seed_on_startup);
    }

    #[test]
    fn test_invalid_boolean() {
        let err = config_from(&[("REGISTRATION_SQL_ECHO", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_empty_sentry_dsn_is_disabled() {
        let config = config_from(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = config_from(&[("REGISTRATION_HOST", "0.0.0.0"), ("REGISTRATION_PORT", "8080")])
            .unwrap();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        assert!(!WebConfig::for_database("sqlite::memory:").secure_cookies());
        let config = config_from(&[("REGISTRATION_BASE_URL", "https://example.com")]).unwrap();
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = WebConfig::for_database("sqlite://secret-path.sqlite");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-path"));
    }
}
