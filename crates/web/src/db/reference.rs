//! Reference table repository (states and countries).

use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::{Country, State};

/// Repository for the read-only reference tables.
pub struct ReferenceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReferenceRepository<'a> {
    /// Create a new reference repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every state, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_states(&self) -> Result<Vec<State>, RepositoryError> {
        let states = sqlx::query_as::<_, State>("SELECT id, name FROM state ORDER BY name")
            .fetch_all(self.pool)
            .await?;
        Ok(states)
    }

    /// List every country, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_countries(&self) -> Result<Vec<Country>, RepositoryError> {
        let countries =
            sqlx::query_as::<_, Country>("SELECT id, name FROM country ORDER BY name")
                .fetch_all(self.pool)
                .await?;
        Ok(countries)
    }
}
