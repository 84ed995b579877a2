//! Domain models for the registration site.

pub mod reference;
pub mod user;

pub use reference::{Country, State};
pub use user::{Registration, User};
