//! HTTP middleware stack for the registration site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, one hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `SQLite` store)

pub mod flash;
pub mod request_id;
pub mod session;

pub use flash::{push_flash, take_flashes};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, create_session_store};
