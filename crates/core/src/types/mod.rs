//! Core types for the registration demo.
//!
//! This module provides type-safe wrappers for the record identifiers and the
//! length-bounded text columns shared by the schema and the form.

pub mod id;
pub mod text;

pub use id::*;
pub use text::{AddressLine, CityName, CountryName, PersonName, StateName, TextError};
