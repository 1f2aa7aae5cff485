//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Extractors: [`OptionalAuth`] for the logged-in customer and
//! [`CsrfToken`] for the session's anti-forgery token.

pub mod auth;
pub mod csrf;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, clear_current_customer, set_current_customer};
pub use csrf::CsrfToken;
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, session_layer};
