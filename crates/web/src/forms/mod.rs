//! Form binding and validation.

pub mod csrf;
pub mod registration;

pub use csrf::CsrfError;
pub use registration::{Choices, FieldErrors, RegistrationForm, RegistrationInput};
