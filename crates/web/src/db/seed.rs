//! Reference data seeding.
//!
//! The demo ships with a fixed set of states and countries. Seeding inserts
//! all of them in one transaction; on a re-run the unique constraint on the
//! name column rejects the first duplicate, the transaction is rolled back,
//! and seeding reports [`SeedOutcome::AlreadySeeded`] instead of failing.

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{RepositoryError, is_unique_violation};

/// States inserted on first run.
pub const SEED_STATES: &[&str] = &["WA", "AK", "LA"];

/// Countries inserted on first run.
pub const SEED_COUNTRIES: &[&str] = &["USA", "Some_Made_Up_Place"];

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Every reference row was inserted.
    Inserted {
        /// Number of states inserted.
        states: usize,
        /// Number of countries inserted.
        countries: usize,
    },
    /// The reference rows were already present; nothing was written.
    AlreadySeeded,
}

/// Insert the demo states and countries.
///
/// # Errors
///
/// Returns `RepositoryError::Database` for any failure other than a unique
/// constraint violation.
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<SeedOutcome, RepositoryError> {
    let mut tx = pool.begin().await?;

    match insert_reference_rows(&mut tx).await {
        Ok(outcome) => {
            tx.commit().await?;
            tracing::info!(?outcome, "Reference data seeded");
            Ok(outcome)
        }
        Err(e) if is_unique_violation(&e) => {
            tx.rollback().await?;
            tracing::info!("Reference data already present, not first run; continuing");
            Ok(SeedOutcome::AlreadySeeded)
        }
        Err(e) => Err(RepositoryError::Database(e)),
    }
}

async fn insert_reference_rows(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<SeedOutcome, sqlx::Error> {
    for name in SEED_STATES {
        sqlx::query("INSERT INTO state (name) VALUES (?)")
            .bind(*name)
            .execute(&mut **tx)
            .await?;
    }

    for name in SEED_COUNTRIES {
        sqlx::query("INSERT INTO country (name) VALUES (?)")
            .bind(*name)
            .execute(&mut **tx)
            .await?;
    }

    Ok(SeedOutcome::Inserted {
        states: SEED_STATES.len(),
        countries: SEED_COUNTRIES.len(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use registration_core::{CountryName, StateName};
    use secrecy::SecretString;

    use super::*;
    use crate::db::{ReferenceRepository, create_all, create_pool};

    async fn empty_schema() -> SqlitePool {
        let pool = create_pool(&SecretString::from("sqlite::memory:"), false)
            .await
            .unwrap();
        create_all(&pool).await.unwrap();
        pool
    }

    #[test]
    fn test_seed_names_fit_their_columns() {
        for name in SEED_STATES {
            assert!(StateName::parse(name).is_ok(), "{name}");
        }
        for name in SEED_COUNTRIES {
            assert!(CountryName::parse(name).is_ok(), "{name}");
        }
    }

    #[tokio::test]
    async fn test_first_run_inserts_everything() {
        let pool = empty_schema().await;
        let outcome = seed_reference_data(&pool).await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Inserted {
                states: 3,
                countries: 2
            }
        );
    }

    #[tokio::test]
    async fn test_second_run_is_swallowed_without_duplicates() {
        let pool = empty_schema().await;
        seed_reference_data(&pool).await.unwrap();

        let outcome = seed_reference_data(&pool).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadySeeded);

        let reference = ReferenceRepository::new(&pool);
        let states: Vec<String> = reference
            .list_states()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name.into_inner())
            .collect();
        assert_eq!(states, vec!["AK", "LA", "WA"]);
        assert_eq!(reference.list_countries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_conflict_rolls_back_whole_batch() {
        let pool = empty_schema().await;
        sqlx::query("INSERT INTO country (name) VALUES ('USA')")
            .execute(&pool)
            .await
            .unwrap();

        let outcome = seed_reference_data(&pool).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadySeeded);

        // The states inserted before the conflict were rolled back too
        let reference = ReferenceRepository::new(&pool);
        assert!(reference.list_states().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tables_is_an_error() {
        let pool = create_pool(&SecretString::from("sqlite::memory:"), false)
            .await
            .unwrap();
        let err = seed_reference_data(&pool).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
