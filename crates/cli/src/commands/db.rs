//! Database schema and seed commands.
//!
//! # Environment Variables
//!
//! - `REGISTRATION_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, default: `sqlite://registration.sqlite`)
//! - `REGISTRATION_SQL_ECHO` - Keep sqlx statement logging on

use registration_web::config::{ConfigError, WebConfig};
use registration_web::db::{self, RepositoryError, SeedOutcome};
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors that can occur during database commands.
#[derive(Debug, Error)]
pub enum DbCommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// Schema or seed statement failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

async fn connect() -> Result<SqlitePool, DbCommandError> {
    let config = WebConfig::from_env()?;

    tracing::info!("Connecting to registration database...");
    Ok(db::create_pool(&config.database_url, config.sql_echo).await?)
}

fn log_seed_outcome(outcome: SeedOutcome) {
    match outcome {
        SeedOutcome::Inserted { states, countries } => {
            tracing::info!(states, countries, "Reference data seeded");
        }
        SeedOutcome::AlreadySeeded => {
            tracing::info!("Reference data already present, nothing to do");
        }
    }
}

/// Create every table that does not exist yet.
pub async fn create() -> Result<(), DbCommandError> {
    let pool = connect().await?;
    db::create_all(&pool).await?;
    tracing::info!("Tables created");
    Ok(())
}

/// Create the tables if needed and seed the reference data.
pub async fn seed() -> Result<(), DbCommandError> {
    let pool = connect().await?;
    log_seed_outcome(db::initialize(&pool).await?);
    Ok(())
}

/// Drop every registration table.
pub async fn drop() -> Result<(), DbCommandError> {
    let pool = connect().await?;
    db::drop_all(&pool).await?;
    Ok(())
}

/// Drop, recreate, and reseed.
pub async fn reset() -> Result<(), DbCommandError> {
    let pool = connect().await?;
    db::drop_all(&pool).await?;
    log_seed_outcome(db::initialize(&pool).await?);
    tracing::info!("Database reset complete");
    Ok(())
}
