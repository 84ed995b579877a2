//! The registration form.
//!
//! Binding, validation, and the view model the template renders. The same
//! form backs both the create and the edit pages.
//!
//! # Fields
//!
//! | Field | Label | Rules |
//! |-------|-------|-------|
//! | `first_name` | First Name | required, max 70 |
//! | `last_name` | Last Name | required, max 70 |
//! | `address_line_one` | Address | required, max 256 |
//! | `address_line_two` | Second Address | optional, max 256 |
//! | `city` | City | required, max 50 |
//! | `state_id` | State | one of the current states |
//! | `country_id` | Country | one of the current countries |
//!
//! Select options carry the row IDs of the reference tables, so a choice
//! keeps pointing at the same row however the tables are ordered.

use serde::Deserialize;
use sqlx::SqlitePool;

use registration_core::{
    AddressLine, CityName, CountryId, PersonName, StateId, TextError,
};

use crate::db::{ReferenceRepository, RepositoryError};
use crate::models::{Country, Registration, State, User};

/// Error shown when a required field is blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Error shown when a select value is not among the current choices.
pub const INVALID_CHOICE_MESSAGE: &str = "Not a valid choice.";

/// Error shown when a text field exceeds its column length.
#[must_use]
pub fn too_long_message(max: usize) -> String {
    format!("Field cannot be longer than {max} characters.")
}

/// Raw form submission.
///
/// Every field defaults to empty so a missing field is reported by validation
/// rather than rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address_line_one: String,
    #[serde(default)]
    pub address_line_two: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state_id: String,
    #[serde(default)]
    pub country_id: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl RegistrationInput {
    /// Pre-fill the form from an existing user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            address_line_one: user.address_line_one.to_string(),
            address_line_two: user
                .address_line_two
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            city: user.city.to_string(),
            state_id: user.state_id.to_string(),
            country_id: user.country_id.to_string(),
            csrf_token: None,
        }
    }

    /// Validate the submission against the current choices.
    ///
    /// # Errors
    ///
    /// Returns every field error found; validation does not stop at the first.
    pub fn validate(&self, choices: &Choices) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();

        let first_name = required(&self.first_name, PersonName::parse, &mut errors.first_name);
        let last_name = required(&self.last_name, PersonName::parse, &mut errors.last_name);
        let address_line_one = required(
            &self.address_line_one,
            AddressLine::parse,
            &mut errors.address_line_one,
        );
        let address_line_two = optional(
            &self.address_line_two,
            AddressLine::parse,
            &mut errors.address_line_two,
        );
        let city = required(&self.city, CityName::parse, &mut errors.city);
        let state_id = select(
            &self.state_id,
            |id: StateId| choices.states.iter().any(|s| s.id == id),
            &mut errors.state_id,
        );
        let country_id = select(
            &self.country_id,
            |id: CountryId| choices.countries.iter().any(|c| c.id == id),
            &mut errors.country_id,
        );

        match (
            first_name,
            last_name,
            address_line_one,
            address_line_two,
            city,
            state_id,
            country_id,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(address_line_one),
                Some(address_line_two),
                Some(city),
                Some(state_id),
                Some(country_id),
            ) => Ok(Registration {
                first_name,
                last_name,
                address_line_one,
                address_line_two,
                city,
                state_id,
                country_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Per-field validation errors, plus form-level errors such as CSRF failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub first_name: Vec<String>,
    pub last_name: Vec<String>,
    pub address_line_one: Vec<String>,
    pub address_line_two: Vec<String>,
    pub city: Vec<String>,
    pub state_id: Vec<String>,
    pub country_id: Vec<String>,
    pub form: Vec<String>,
}

/// Current contents of the reference tables, used as select choices.
#[derive(Debug, Clone, Default)]
pub struct Choices {
    pub states: Vec<State>,
    pub countries: Vec<Country>,
}

impl Choices {
    /// Load the choices from the reference tables.
    ///
    /// Called on every request so the form always reflects the tables.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn load(pool: &SqlitePool) -> Result<Self, RepositoryError> {
        let reference = ReferenceRepository::new(pool);
        Ok(Self {
            states: reference.list_states().await?,
            countries: reference.list_countries().await?,
        })
    }
}

// =============================================================================
// View Model
// =============================================================================

/// A text input as rendered by the template.
#[derive(Debug, Clone)]
pub struct TextField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub max_length: usize,
    pub required: bool,
    pub errors: Vec<String>,
}

/// One `<option>` of a select.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
    pub selected: bool,
}

/// A select input as rendered by the template.
#[derive(Debug, Clone)]
pub struct SelectField {
    pub name: &'static str,
    pub label: &'static str,
    pub options: Vec<SelectOption>,
    pub errors: Vec<String>,
}

/// Everything the registration template needs to draw the form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub text_fields: Vec<TextField>,
    pub select_fields: Vec<SelectField>,
    pub form_errors: Vec<String>,
}

impl RegistrationForm {
    /// Build the view from submitted (or pre-filled) values and any errors.
    #[must_use]
    pub fn new(input: &RegistrationInput, choices: &Choices, errors: FieldErrors) -> Self {
        let text_fields = vec![
            text_field(
                "first_name",
                "First Name",
                &input.first_name,
                PersonName::MAX_LENGTH,
                true,
                errors.first_name,
            ),
            text_field(
                "last_name",
                "Last Name",
                &input.last_name,
                PersonName::MAX_LENGTH,
                true,
                errors.last_name,
            ),
            text_field(
                "address_line_one",
                "Address",
                &input.address_line_one,
                AddressLine::MAX_LENGTH,
                true,
                errors.address_line_one,
            ),
            text_field(
                "address_line_two",
                "Second Address",
                &input.address_line_two,
                AddressLine::MAX_LENGTH,
                false,
                errors.address_line_two,
            ),
            text_field(
                "city",
                "City",
                &input.city,
                CityName::MAX_LENGTH,
                true,
                errors.city,
            ),
        ];

        let selected_state = input.state_id.parse::<StateId>().ok();
        let selected_country = input.country_id.parse::<CountryId>().ok();

        let select_fields = vec![
            SelectField {
                name: "state_id",
                label: "State",
                options: choices
                    .states
                    .iter()
                    .map(|s| SelectOption {
                        value: s.id.as_i64(),
                        label: s.name.to_string(),
                        selected: selected_state == Some(s.id),
                    })
                    .collect(),
                errors: errors.state_id,
            },
            SelectField {
                name: "country_id",
                label: "Country",
                options: choices
                    .countries
                    .iter()
                    .map(|c| SelectOption {
                        value: c.id.as_i64(),
                        label: c.name.to_string(),
                        selected: selected_country == Some(c.id),
                    })
                    .collect(),
                errors: errors.country_id,
            },
        ];

        Self {
            text_fields,
            select_fields,
            form_errors: errors.form,
        }
    }

    /// An empty form.
    #[must_use]
    pub fn blank(choices: &Choices) -> Self {
        Self::new(&RegistrationInput::default(), choices, FieldErrors::default())
    }
}

// =============================================================================
// Validators
// =============================================================================

fn text_error_message(err: &TextError) -> String {
    match err {
        TextError::Empty => REQUIRED_MESSAGE.to_string(),
        TextError::TooLong { max } => too_long_message(*max),
    }
}

/// A required text field; blank input is an error.
fn required<T>(
    raw: &str,
    parse: fn(&str) -> Result<T, TextError>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(text_error_message(&e));
            None
        }
    }
}

/// An optional text field; blank input is `Some(None)`.
fn optional<T>(
    raw: &str,
    parse: fn(&str) -> Result<T, TextError>,
    errors: &mut Vec<String>,
) -> Option<Option<T>> {
    if raw.trim().is_empty() {
        return Some(None);
    }
    required(raw, parse, errors).map(Some)
}

/// A select field whose value must parse as an ID and be among the choices.
fn select<I, F>(raw: &str, is_choice: F, errors: &mut Vec<String>) -> Option<I>
where
    I: std::str::FromStr + Copy,
    F: Fn(I) -> bool,
{
    if raw.trim().is_empty() {
        errors.push(REQUIRED_MESSAGE.to_string());
        return None;
    }

    match raw.parse::<I>() {
        Ok(id) if is_choice(id) => Some(id),
        _ => {
            errors.push(INVALID_CHOICE_MESSAGE.to_string());
            None
        }
    }
}

fn text_field(
    name: &'static str,
    label: &'static str,
    value: &str,
    max_length: usize,
    required: bool,
    errors: Vec<String>,
) -> TextField {
    TextField {
        name,
        label,
        value: value.to_owned(),
        max_length,
        required,
        errors,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use registration_core::{CountryName, StateName};

    use super::*;

    fn choices() -> Choices {
        Choices {
            states: vec![
                State {
                    id: StateId::new(2),
                    name: StateName::parse("AK").unwrap(),
                },
                State {
                    id: StateId::new(1),
                    name: StateName::parse("WA").unwrap(),
                },
            ],
            countries: vec![Country {
                id: CountryId::new(1),
                name: CountryName::parse("USA").unwrap(),
            }],
        }
    }

    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address_line_one: "12 St James's Square".to_string(),
            address_line_two: String::new(),
            city: "London".to_string(),
            state_id: "1".to_string(),
            country_id: "1".to_string(),
            csrf_token: None,
        }
    }

    #[test]
    fn test_valid_input() {
        let registration = valid_input().validate(&choices()).unwrap();
        assert_eq!(registration.first_name.as_str(), "Ada");
        assert_eq!(registration.address_line_two, None);
        assert_eq!(registration.state_id, StateId::new(1));
        assert_eq!(registration.country_id, CountryId::new(1));
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut input = valid_input();
        input.city = "  London  ".to_string();
        input.address_line_two = "  Flat 2 ".to_string();
        let registration = input.validate(&choices()).unwrap();
        assert_eq!(registration.city.as_str(), "London");
        assert_eq!(
            registration.address_line_two.as_ref().map(AddressLine::as_str),
            Some("Flat 2")
        );
    }

    #[test]
    fn test_required_fields() {
        let errors = RegistrationInput::default()
            .validate(&choices())
            .unwrap_err();
        assert_eq!(errors.first_name, vec![REQUIRED_MESSAGE]);
        assert_eq!(errors.last_name, vec![REQUIRED_MESSAGE]);
        assert_eq!(errors.address_line_one, vec![REQUIRED_MESSAGE]);
        assert_eq!(errors.city, vec![REQUIRED_MESSAGE]);
        assert_eq!(errors.state_id, vec![REQUIRED_MESSAGE]);
        assert_eq!(errors.country_id, vec![REQUIRED_MESSAGE]);
        // The second address line is optional
        assert!(errors.address_line_two.is_empty());
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut input = valid_input();
        input.last_name = "   ".to_string();
        let errors = input.validate(&choices()).unwrap_err();
        assert_eq!(errors.last_name, vec![REQUIRED_MESSAGE]);
    }

    #[test]
    fn test_too_long() {
        let mut input = valid_input();
        input.city = "x".repeat(51);
        input.address_line_two = "y".repeat(257);
        let errors = input.validate(&choices()).unwrap_err();
        assert_eq!(
            errors.city,
            vec!["Field cannot be longer than 50 characters."]
        );
        assert_eq!(
            errors.address_line_two,
            vec!["Field cannot be longer than 256 characters."]
        );
    }

    #[test]
    fn test_select_must_be_a_choice() {
        let mut input = valid_input();
        input.state_id = "3".to_string();
        input.country_id = "usa".to_string();
        let errors = input.validate(&choices()).unwrap_err();
        assert_eq!(errors.state_id, vec![INVALID_CHOICE_MESSAGE]);
        assert_eq!(errors.country_id, vec![INVALID_CHOICE_MESSAGE]);
    }

    #[test]
    fn test_select_uses_ids_not_positions() {
        // AK is listed first but has id 2
        let mut input = valid_input();
        input.state_id = "2".to_string();
        let registration = input.validate(&choices()).unwrap();
        assert_eq!(registration.state_id, StateId::new(2));
    }

    #[test]
    fn test_view_keeps_submitted_values_and_errors() {
        let mut input = valid_input();
        input.first_name = String::new();
        let errors = input.validate(&choices()).unwrap_err();
        let form = RegistrationForm::new(&input, &choices(), errors);

        assert_eq!(form.text_fields[0].name, "first_name");
        assert_eq!(form.text_fields[0].errors, vec![REQUIRED_MESSAGE]);
        assert_eq!(form.text_fields[1].value, "Lovelace");
        assert!(!form.text_fields[3].required);

        let state_options = &form.select_fields[0].options;
        assert_eq!(state_options.len(), 2);
        assert!(!state_options[0].selected);
        assert!(state_options[1].selected);
        assert_eq!(state_options[1].label, "WA");
    }

    #[test]
    fn test_blank_form_selects_nothing() {
        let form = RegistrationForm::blank(&choices());
        assert!(form.text_fields.iter().all(|f| f.value.is_empty()));
        assert!(
            form.select_fields
                .iter()
                .flat_map(|f| f.options.iter())
                .all(|o| !o.selected)
        );
        assert!(form.form_errors.is_empty());
    }
}
