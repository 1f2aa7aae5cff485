//! JSON API routes for admin.
//!
//! Responses use the `{ "success": bool, "data": ... }` envelope the
//! settings page script expects.

pub mod products;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::state::AppState;

/// Build the API router (mounted under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/products/search", get(products::search))
}

/// Response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// A successful response.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error response for API endpoints.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.report();
        Self::new(err.status(), err.public_message())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        AppError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: false,
            data: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
