//! Registered user domain types.
//!
//! These types represent validated domain objects separate from the raw form
//! input they are built from.

use chrono::{DateTime, Utc};

use registration_core::{
    AddressLine, CityName, CountryId, CountryName, PersonName, StateId, StateName, UserId,
};

/// A registered user, joined with the names of its state and country.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub address_line_one: AddressLine,
    /// Optional second address line; stored as NULL when left blank.
    pub address_line_two: Option<AddressLine>,
    pub city: CityName,
    pub state_id: StateId,
    pub state_name: StateName,
    pub country_id: CountryId,
    pub country_name: CountryName,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last edited.
    pub updated_at: DateTime<Utc>,
}

/// A validated registration, ready to be written.
///
/// Produced by the registration form once every field has passed validation.
/// The same bundle drives both creating a user and editing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub address_line_one: AddressLine,
    pub address_line_two: Option<AddressLine>,
    pub city: CityName,
    pub state_id: StateId,
    pub country_id: CountryId,
}
