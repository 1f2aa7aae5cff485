//! Sell Restrict storefront library.
//!
//! The customer-facing half of the system: session cart, checkout with the
//! restriction guard, product notices and the removal endpoint. Exposed as
//! a library so the router can be driven in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

use axum::Router;
use tower_sessions::{SessionManagerLayer, SessionStore};

use state::AppState;

/// Build the storefront router over a session layer.
///
/// Static files, tracing and Sentry layers are added by the binary.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes::routes()
        .layer(sessions)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .with_state(state)
}
