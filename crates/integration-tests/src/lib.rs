//! Integration test harness for the registration site.
//!
//! Every [`TestContext`] owns a fresh in-memory database with the schema and
//! reference data in place, and drives the same router the server runs
//! through `tower::ServiceExt::oneshot`. No network or external database is
//! needed.
//!
//! ```bash
//! cargo test -p registration-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::cookie::Cookie;

use registration_web::{app::build_router, config::WebConfig, db, middleware, state::AppState};

/// Largest body the helpers will buffer.
const BODY_LIMIT: usize = 1024 * 1024;

/// Test context holding the router, its database, and the session cookie.
pub struct TestContext {
    pub app: Router,
    pub db: SqlitePool,
    cookie: Option<String>,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl TestContext {
    /// Context with CSRF checking switched off.
    pub async fn new() -> Self {
        Self::with_csrf(false).await
    }

    /// Context with CSRF checking switched on or off.
    pub async fn with_csrf(csrf_enabled: bool) -> Self {
        let mut config = WebConfig::for_database("sqlite::memory:");
        config.csrf_enabled = csrf_enabled;

        let pool = db::create_pool(&SecretString::from("sqlite::memory:"), false)
            .await
            .unwrap();
        db::initialize(&pool).await.unwrap();
        let store = middleware::create_session_store(&pool).await.unwrap();

        let app = build_router(AppState::new(config, pool.clone()), store);

        Self {
            app,
            db: pool,
            cookie: None,
        }
    }

    /// Send a GET request, carrying the session cookie.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a urlencoded form POST, carrying the session cookie.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// Number of rows in `registered_user`.
    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM registered_user")
            .fetch_one(&self.db)
            .await
            .unwrap()
    }

    /// Number of rows in a reference table.
    pub async fn reference_count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db)
            .await
            .unwrap()
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        self.remember_cookie(&response);

        let status = response.status();
        let location = header_string(&response, header::LOCATION.as_str());
        let request_id = header_string(&response, "x-request-id");
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();

        TestResponse {
            status,
            location,
            request_id,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn remember_cookie(&mut self, response: &Response) {
        if let Some(set_cookie) = header_string(response, header::SET_COOKIE.as_str()) {
            let cookie = Cookie::parse(set_cookie).unwrap();
            self.cookie = Some(cookie.stripped().to_string());
        }
    }
}

impl TestResponse {
    /// Value of the hidden `csrf_token` input in a rendered form.
    pub fn csrf_token(&self) -> Option<String> {
        let marker = r#"name="csrf_token" value=""#;
        let start = self.body.find(marker)? + marker.len();
        let end = self.body[start..].find('"')? + start;
        Some(self.body[start..end].to_owned())
    }
}

/// A complete, valid submission (Alaska, USA).
#[must_use]
pub fn valid_registration() -> Vec<(&'static str, &'static str)> {
    vec![
        ("first_name", "Ada"),
        ("last_name", "Lovelace"),
        ("address_line_one", "1 Analytical Way"),
        ("address_line_two", ""),
        ("city", "Anchorage"),
        ("state_id", "2"),
        ("country_id", "1"),
    ]
}

/// Replace one field of a submission.
#[must_use]
pub fn with_field<'a>(
    mut fields: Vec<(&'a str, &'a str)>,
    name: &'a str,
    value: &'a str,
) -> Vec<(&'a str, &'a str)> {
    match fields.iter_mut().find(|(key, _)| *key == name) {
        Some(field) => field.1 = value,
        None => fields.push((name, value)),
    }
    fields
}

fn header_string(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
