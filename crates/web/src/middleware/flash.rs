//! One-shot flash messages.
//!
//! A handler queues a message before redirecting; the next page that renders
//! messages drains the queue, so each message is shown exactly once.

use tower_sessions::Session;

use super::session::session_keys;

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queue: Vec<String> = session
        .get(session_keys::FLASHES)
        .await?
        .unwrap_or_default();
    queue.push(message.into());
    session.insert(session_keys::FLASHES, queue).await
}

/// Remove and return every queued message.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn take_flashes(
    session: &Session,
) -> Result<Vec<String>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<String>>(session_keys::FLASHES)
        .await?
        .unwrap_or_default())
}
