//! Authentication extractors for admin.
//!
//! An admin is identified by the role stored in their session after login,
//! or by an `Authorization: Bearer <token>` header carrying one of the
//! configured access tokens (for scripted calls to the JSON API).
//!
//! Rejections depend on where the request was going: pages redirect to the
//! login page, `/api/` requests get the `{ success: false, data }` envelope.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Extractor that requires any signed-in admin.
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Extractor that requires the [`AdminRole::ShopManager`] role.
///
/// [`AdminRole::ShopManager`]: crate::models::AdminRole::ShopManager
#[derive(Debug)]
pub struct RequireShopManager(pub CurrentAdmin);

/// Error returned when an admin extractor rejects a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Not signed in (for API requests).
    Unauthorized,
    /// Signed in, but the role may not do this.
    Forbidden { api: bool },
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "data": "Authentication required." })),
            )
                .into_response(),
            Self::Forbidden { api: true } => (
                StatusCode::FORBIDDEN,
                Json(json!({ "success": false, "data": "Insufficient permissions." })),
            )
                .into_response(),
            Self::Forbidden { api: false } => (
                StatusCode::FORBIDDEN,
                "Your role cannot change these settings.",
            )
                .into_response(),
        }
    }
}

fn is_api_request(parts: &Parts) -> bool {
    // Nested routers see a stripped URI; the original one tells us the prefix.
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.0.path())
        .starts_with("/api/")
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn current_admin(parts: &Parts, state: &AppState) -> Option<CurrentAdmin> {
    if let Some(session) = parts.extensions.get::<Session>()
        && let Ok(Some(admin)) = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
    {
        return Some(admin);
    }

    let token = bearer_token(parts)?;
    AdminAuthService::new(&state.config().access)
        .authenticate(token)
        .ok()
        .map(|role| CurrentAdmin { role })
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_admin(parts, state).await {
            Some(admin) => Ok(Self(admin)),
            None if is_api_request(parts) => Err(AdminAuthRejection::Unauthorized),
            None => Err(AdminAuthRejection::RedirectToLogin),
        }
    }
}

impl FromRequestParts<AppState> for RequireShopManager {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdminAuth(admin) = RequireAdminAuth::from_request_parts(parts, state).await?;

        if !admin.role.can_manage() {
            tracing::warn!(role = %admin.role, "Admin lacks the shop manager role");
            return Err(AdminAuthRejection::Forbidden {
                api: is_api_request(parts),
            });
        }

        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject the request if the admin is not logged in.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl FromRequestParts<AppState> for OptionalAdminAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_admin(parts, state).await))
    }
}

/// Helper to set the current admin in the session.
///
/// The session id is rotated first so a pre-login session cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
