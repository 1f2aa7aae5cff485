//! Sell Restrict admin library.
//!
//! The shop manager's half of the system: the restriction settings page
//! (the only writer of the Settings Store) and the catalog search that
//! feeds its product picker.
//!
//! # Security
//!
//! Every page except login and health requires a signed-in admin. Saving
//! settings and searching products additionally require the shop manager
//! role.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::Router;
use tower_sessions::{SessionManagerLayer, SessionStore};

use state::AppState;

/// Build the admin router over a session layer.
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
