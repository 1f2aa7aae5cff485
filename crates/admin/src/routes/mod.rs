//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! GET  /                       - Redirect to the settings page
//!
//! # Auth (access token)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Exchange a token for a session
//! POST /auth/logout            - Logout
//!
//! # Settings
//! GET  /settings               - Restriction settings page (any admin)
//! POST /settings               - Save settings (shop manager)
//!
//! # API
//! GET  /api/products/search    - Product picker search (shop manager)
//! ```

pub mod api;
pub mod auth;
pub mod health;
pub mod settings;

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

/// Create all routes for the admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/settings") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth::router())
        .merge(settings::router())
        .nest("/api", api::router())
}
