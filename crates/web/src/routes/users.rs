//! Registered user route handlers: detail page and edit form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use registration_core::UserId;

use super::registration::{RegistrationTemplate, check_submission};
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{Choices, FieldErrors, RegistrationForm, RegistrationInput, csrf};
use crate::middleware::{push_flash, take_flashes};
use crate::models::User;
use crate::state::AppState;

/// Flash message queued after a successful edit.
pub const UPDATED_MESSAGE: &str = "Your changes were saved to the database!";

/// User detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "success.html")]
pub struct UserDetailTemplate {
    pub user: User,
    pub messages: Vec<String>,
}

/// Parse a path segment as a user ID; anything unparsable cannot exist.
fn parse_user_id(raw: &str) -> Result<UserId> {
    raw.parse::<UserId>()
        .map_err(|_| AppError::NotFound(format!("user {raw}")))
}

/// Load a user or fail with 404.
async fn find_user(state: &AppState, user_id: UserId) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))
}

/// Display a registered user, along with any pending flash messages.
#[instrument(skip(state, session))]
pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
) -> Result<UserDetailTemplate> {
    let user = find_user(&state, parse_user_id(&user_id)?).await?;
    let messages = take_flashes(&session).await?;

    Ok(UserDetailTemplate { user, messages })
}

/// Display the edit form, pre-filled with the user's current values.
#[instrument(skip(state, session))]
pub async fn edit_page(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
) -> Result<RegistrationTemplate> {
    let user = find_user(&state, parse_user_id(&user_id)?).await?;
    let choices = Choices::load(state.pool()).await?;
    let csrf_token = csrf::session_token(&session).await?;

    let input = RegistrationInput::from_user(&user);
    let form = RegistrationForm::new(&input, &choices, FieldErrors::default());

    Ok(RegistrationTemplate::edit(user.id, form, csrf_token))
}

/// Handle edit form submission.
#[instrument(skip(state, session, input))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
    Form(input): Form<RegistrationInput>,
) -> Result<Response> {
    let user = find_user(&state, parse_user_id(&user_id)?).await?;
    let choices = Choices::load(state.pool()).await?;

    match check_submission(&state, &session, &input, &choices).await? {
        Ok(registration) => {
            UserRepository::new(state.pool())
                .update(user.id, &registration)
                .await?;
            tracing::info!(user_id = %user.id, "User updated");

            push_flash(&session, UPDATED_MESSAGE).await?;
            Ok(Redirect::to(&format!("/user/{}", user.id)).into_response())
        }
        Err(errors) => {
            tracing::debug!(?errors, "Update rejected");
            let csrf_token = csrf::session_token(&session).await?;
            let template = RegistrationTemplate::edit(
                user.id,
                RegistrationForm::new(&input, &choices, errors),
                csrf_token,
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}
