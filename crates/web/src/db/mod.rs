//! Database operations for the registration `SQLite` store.
//!
//! # Tables
//!
//! - `state` - Reference table of state names (unique)
//! - `country` - Reference table of country names (unique)
//! - `registered_user` - Submitted registrations, each pointing at one state
//!   and one country
//! - `tower_sessions` - Session storage, owned by the session store and left
//!   alone by [`drop_all`]
//!
//! # Lifecycle
//!
//! [`create_all`] and [`drop_all`] are idempotent. [`initialize`] creates the
//! tables and then seeds the reference data; it runs at startup, from the
//! `/create_db` route, and from `reg-cli db seed`.

pub mod reference;
pub mod seed;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::ConnectOptions;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use reference::ReferenceRepository;
pub use seed::{SEED_COUNTRIES, SEED_STATES, SeedOutcome, seed_reference_data};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name, missing foreign key).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Table definitions, parents before children.
const CREATE_TABLES: [&str; 3] = [
    r"
    CREATE TABLE IF NOT EXISTS state (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE CHECK (length(name) <= 10)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS country (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE CHECK (length(name) <= 256)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS registered_user (
        id               INTEGER PRIMARY KEY,
        first_name       TEXT NOT NULL CHECK (length(first_name) <= 70),
        last_name        TEXT NOT NULL CHECK (length(last_name) <= 70),
        address_line_one TEXT NOT NULL CHECK (length(address_line_one) <= 256),
        address_line_two TEXT CHECK (length(address_line_two) <= 256),
        city             TEXT NOT NULL CHECK (length(city) <= 50),
        state_id         INTEGER NOT NULL REFERENCES state (id),
        country_id       INTEGER NOT NULL REFERENCES country (id),
        created_at       TEXT NOT NULL,
        updated_at       TEXT NOT NULL
    )
    ",
];

/// Tables dropped by [`drop_all`], children before parents.
const DROP_TABLES: [&str; 3] = [
    "DROP TABLE IF EXISTS registered_user",
    "DROP TABLE IF EXISTS state",
    "DROP TABLE IF EXISTS country",
];

/// Create a `SQLite` connection pool.
///
/// The database file is created if it does not exist and foreign keys are
/// enforced on every connection. An in-memory URL gets a single connection
/// that is never recycled, since every new connection would otherwise see
/// its own empty database.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
/// * `sql_echo` - Keep sqlx statement logging (target `sqlx::query`) switched on
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    sql_echo: bool,
) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();

    let mut options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    if !sql_echo {
        options = options.disable_statement_logging();
    }

    let pool_options = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create every table that does not exist yet.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn create_all(pool: &SqlitePool) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::debug!("Schema created");
    Ok(())
}

/// Drop the registration tables.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn drop_all(pool: &SqlitePool) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;
    for statement in DROP_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("All registration tables dropped");
    Ok(())
}

/// Create the schema and seed the reference tables.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if schema creation or seeding fails for
/// any reason other than the reference rows already being present.
pub async fn initialize(pool: &SqlitePool) -> Result<SeedOutcome, RepositoryError> {
    create_all(pool).await?;
    seed_reference_data(pool).await
}

/// Whether an sqlx error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Map insert/update failures, turning constraint violations into `Conflict`.
pub(crate) fn map_write_error(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && (db_err.is_foreign_key_violation() || db_err.is_check_violation())
    {
        return RepositoryError::Conflict(format!("{what}: {}", db_err.message()));
    }
    RepositoryError::Database(err)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_all_is_idempotent() {
        let pool = create_pool(&SecretString::from("sqlite::memory:"), false)
            .await
            .unwrap();
        create_all(&pool).await.unwrap();
        create_all(&pool).await.unwrap();

        assert_eq!(
            table_names(&pool).await,
            vec!["country", "registered_user", "state"]
        );
    }

    #[tokio::test]
    async fn test_drop_all_removes_tables() {
        let pool = test_support::seeded_pool().await;
        drop_all(&pool).await.unwrap();
        assert!(table_names(&pool).await.is_empty());

        // Dropping again is harmless
        drop_all(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_then_initialize_restores_seed_rows() {
        let pool = test_support::seeded_pool().await;
        drop_all(&pool).await.unwrap();

        let outcome = initialize(&pool).await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Inserted {
                states: SEED_STATES.len(),
                countries: SEED_COUNTRIES.len(),
            }
        );

        let reference = ReferenceRepository::new(&pool);
        assert_eq!(reference.list_states().await.unwrap().len(), 3);
        assert_eq!(reference.list_countries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = test_support::seeded_pool().await;
        let err = sqlx::query(
            "INSERT INTO registered_user
                (first_name, last_name, address_line_one, city, state_id, country_id, created_at, updated_at)
             VALUES ('a', 'b', 'c', 'd', 999, 999, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap_err();

        assert!(matches!(
            map_write_error(err, "user"),
            RepositoryError::Conflict(_)
        ));
    }
}
