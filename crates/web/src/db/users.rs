//! Registered user repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use registration_core::UserId;

use super::{RepositoryError, map_write_error};
use crate::models::{Registration, User};

const SELECT_USER: &str = r"
    SELECT u.id, u.first_name, u.last_name, u.address_line_one, u.address_line_two,
           u.city, u.state_id, s.name AS state_name, u.country_id, c.name AS country_name,
           u.created_at, u.updated_at
    FROM registered_user u
    JOIN state s ON s.id = u.state_id
    JOIN country c ON c.id = u.country_id
    WHERE u.id = ?
";

/// Repository for registered user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by ID, joined with its state and country names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(SELECT_USER)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a new user from a validated registration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the state or country no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, registration: &Registration) -> Result<UserId, RepositoryError> {
        let now = Utc::now();

        let id: UserId = sqlx::query_scalar(
            r"
            INSERT INTO registered_user
                (first_name, last_name, address_line_one, address_line_two, city,
                 state_id, country_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.address_line_one)
        .bind(registration.address_line_two.as_ref())
        .bind(&registration.city)
        .bind(registration.state_id)
        .bind(registration.country_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "cannot create user"))?;

        Ok(id)
    }

    /// Overwrite a user's fields with a validated registration.
    ///
    /// The ID and creation time are never changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the state or country no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        registration: &Registration,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE registered_user
            SET first_name = ?, last_name = ?, address_line_one = ?, address_line_two = ?,
                city = ?, state_id = ?, country_id = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.address_line_one)
        .bind(registration.address_line_two.as_ref())
        .bind(&registration.city)
        .bind(registration.state_id)
        .bind(registration.country_id)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| map_write_error(e, "cannot update user"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
