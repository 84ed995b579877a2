//! CSRF tokens for form posts.
//!
//! Each session holds one random token (128-bit, URL-safe base64). Rendered
//! forms embed it in a hidden `csrf_token` field and posts must send it back.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::middleware::session::session_keys;

/// Why a submitted token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CsrfError {
    /// The form did not carry a token, or the session has none.
    #[error("The CSRF token is missing.")]
    Missing,
    /// The form token does not match the session token.
    #[error("The CSRF token is invalid.")]
    Invalid,
}

/// Generate a new random token.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Get the session's token, creating and storing one if needed.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn session_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(session_keys::CSRF_TOKEN).await? {
        return Ok(token);
    }

    let token = generate_token();
    session.insert(session_keys::CSRF_TOKEN, &token).await?;
    Ok(token)
}

/// Compare a submitted token with the session's.
///
/// # Errors
///
/// Returns `CsrfError::Missing` if either token is absent or empty and
/// `CsrfError::Invalid` if they differ.
pub fn verify(expected: Option<&str>, submitted: Option<&str>) -> Result<(), CsrfError> {
    let expected = expected.filter(|t| !t.is_empty()).ok_or(CsrfError::Missing)?;
    let submitted = submitted.filter(|t| !t.is_empty()).ok_or(CsrfError::Missing)?;

    if constant_time_eq(expected.as_bytes(), submitted.as_bytes()) {
        Ok(())
    } else {
        Err(CsrfError::Invalid)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
