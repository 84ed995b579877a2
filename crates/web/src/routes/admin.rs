//! Administrative routes: create or wipe the registration tables.
//!
//! These are development conveniences with no authentication; do not expose
//! them on a public network.

use axum::extract::State;
use tracing::instrument;

use crate::db::{self, SeedOutcome};
use crate::error::Result;
use crate::state::AppState;

/// Create the tables and seed the reference data.
///
/// Safe to call repeatedly: existing tables are kept and a second seed is a no-op.
#[instrument(skip(state))]
pub async fn create_db(State(state): State<AppState>) -> Result<&'static str> {
    match db::initialize(state.pool()).await? {
        SeedOutcome::Inserted { states, countries } => {
            tracing::info!(states, countries, "Database initialized");
        }
        SeedOutcome::AlreadySeeded => {
            tracing::info!("Database already initialized");
        }
    }
    Ok("db created")
}

/// Drop every registration table.
#[instrument(skip(state))]
pub async fn drop_all(State(state): State<AppState>) -> Result<&'static str> {
    db::drop_all(state.pool()).await?;
    Ok("db dropped")
}
