//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, SameSite=Strict)
//!
//! Extractors: [`RequireAdminAuth`] for any signed-in admin and
//! [`RequireShopManager`] for actions that change settings or read the
//! catalog.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    AdminAuthRejection, OptionalAdminAuth, RequireAdminAuth, RequireShopManager,
    clear_current_admin, set_current_admin,
};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, session_layer};
