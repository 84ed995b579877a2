//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. Sessions carry the
//! CSRF token and the queue of flash messages.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "registration_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The per-session CSRF token.
    pub const CSRF_TOKEN: &str = "csrf_token";
    /// Pending flash messages.
    pub const FLASHES: &str = "_flashes";
}

/// Create the session store and its table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn create_session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer over an existing store.
///
/// # Arguments
///
/// * `store` - `SQLite` session store
/// * `config` - Web configuration (for the secure-cookie decision)
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &WebConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
