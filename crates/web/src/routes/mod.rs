//! HTTP route handlers for the registration site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Registration form
//! POST /                       - Submit registration, redirect to /user/{id}
//! GET  /demonstration          - Same form under its tutorial path
//! POST /demonstration          - Same submission under its tutorial path
//!
//! # Users
//! GET  /user/{id}              - User detail (404 if absent)
//! GET  /update_user/{id}       - Edit form, pre-filled
//! POST /update_user/{id}       - Apply edits, redirect to /user/{id}
//!
//! # Admin
//! GET  /create_db              - Create tables and seed reference data
//! GET  /create_all             - Alias of /create_db
//! GET  /drop_all               - Drop every registration table
//!
//! # Health
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (database reachable)
//! ```

pub mod admin;
pub mod health;
pub mod registration;
pub mod users;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/{user_id}", get(users::detail))
        .route(
            "/update_user/{user_id}",
            get(users::edit_page).post(users::update),
        )
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/create_db", get(admin::create_db))
        .route("/create_all", get(admin::create_db))
        .route("/drop_all", get(admin::drop_all))
}

/// Create all routes for the registration site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(registration::form_page).post(registration::submit),
        )
        .route(
            "/demonstration",
            get(registration::form_page).post(registration::submit),
        )
        .merge(user_routes())
        .merge(admin_routes())
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
