//! Reference table rows.

use registration_core::{CountryId, CountryName, StateId, StateName};

/// A row of the `state` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct State {
    pub id: StateId,
    pub name: StateName,
}

/// A row of the `country` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Country {
    pub id: CountryId,
    pub name: CountryName,
}
