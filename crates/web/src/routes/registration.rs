//! Registration form route handlers.
//!
//! `GET` renders an empty form; `POST` validates the submission, writes a new
//! user, queues a flash message, and redirects to the user's detail page.
//! A failed validation re-renders the form with the submitted values.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use registration_core::UserId;

use crate::db::UserRepository;
use crate::error::Result;
use crate::filters;
use crate::forms::{Choices, FieldErrors, RegistrationForm, RegistrationInput, csrf};
use crate::middleware::push_flash;
use crate::middleware::session::session_keys;
use crate::models::Registration;
use crate::state::AppState;

/// Flash message queued after a successful registration.
pub const SAVED_MESSAGE: &str = "This data was saved to the database!";

/// Registration form page template, shared by the create and edit pages.
#[derive(Template, WebTemplate)]
#[template(path = "registration.html")]
pub struct RegistrationTemplate {
    pub heading: String,
    pub action: String,
    pub submit_label: &'static str,
    pub csrf_token: String,
    pub form: RegistrationForm,
    pub messages: Vec<String>,
}

impl RegistrationTemplate {
    /// The new-registration page, posting back to `action`.
    #[must_use]
    pub fn create(action: &str, form: RegistrationForm, csrf_token: String) -> Self {
        Self {
            heading: "Register".to_string(),
            action: action.to_owned(),
            submit_label: "Register",
            csrf_token,
            form,
            messages: Vec::new(),
        }
    }

    /// The edit page for an existing user.
    #[must_use]
    pub fn edit(user_id: UserId, form: RegistrationForm, csrf_token: String) -> Self {
        Self {
            heading: format!("Update user {user_id}"),
            action: format!("/update_user/{user_id}"),
            submit_label: "Save changes",
            csrf_token,
            form,
            messages: Vec::new(),
        }
    }
}

/// Display the registration form.
#[instrument(skip(state, session))]
pub async fn form_page(
    State(state): State<AppState>,
    session: Session,
    uri: Uri,
) -> Result<RegistrationTemplate> {
    let choices = Choices::load(state.pool()).await?;
    let csrf_token = csrf::session_token(&session).await?;

    Ok(RegistrationTemplate::create(
        uri.path(),
        RegistrationForm::blank(&choices),
        csrf_token,
    ))
}

/// Handle registration form submission.
#[instrument(skip(state, session, input))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    uri: Uri,
    Form(input): Form<RegistrationInput>,
) -> Result<Response> {
    let choices = Choices::load(state.pool()).await?;

    match check_submission(&state, &session, &input, &choices).await? {
        Ok(registration) => {
            let user_id = UserRepository::new(state.pool())
                .create(&registration)
                .await?;
            tracing::info!(user_id = %user_id, "User registered");

            push_flash(&session, SAVED_MESSAGE).await?;
            Ok(Redirect::to(&format!("/user/{user_id}")).into_response())
        }
        Err(errors) => {
            tracing::debug!(?errors, "Registration rejected");
            let csrf_token = csrf::session_token(&session).await?;
            let template = RegistrationTemplate::create(
                uri.path(),
                RegistrationForm::new(&input, &choices, errors),
                csrf_token,
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

/// Validate a submission, including its CSRF token when checking is enabled.
///
/// The outer `Result` carries session failures; the inner one carries the
/// validated registration or the errors to show on the re-rendered form.
pub(crate) async fn check_submission(
    state: &AppState,
    session: &Session,
    input: &RegistrationInput,
    choices: &Choices,
) -> Result<std::result::Result<Registration, FieldErrors>> {
    let csrf_check = if state.config().csrf_enabled {
        let expected = session.get::<String>(session_keys::CSRF_TOKEN).await?;
        csrf::verify(expected.as_deref(), input.csrf_token.as_deref())
    } else {
        Ok(())
    };

    Ok(match (csrf_check, input.validate(choices)) {
        (Ok(()), Ok(registration)) => Ok(registration),
        (csrf_check, validated) => {
            let mut errors = validated.err().unwrap_or_default();
            if let Err(e) = csrf_check {
                errors.form.push(e.to_string());
            }
            Err(errors)
        }
    })
}
