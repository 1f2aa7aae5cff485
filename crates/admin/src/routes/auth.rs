//! Authentication route handlers for admin.
//!
//! Admins sign in by pasting an access token. The role it grants is kept
//! in the session; logging out flushes the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::{Result, clear_sentry_user, set_sentry_admin};
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub role: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip(admin))]
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to("/settings").into_response();
    }

    LoginTemplate {
        error: None,
        role: None,
    }
    .into_response()
}

/// Exchange an access token for a session.
///
/// POST /auth/login
#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AdminAuthService::new(&state.config().access).authenticate(&form.token) {
        Ok(role) => {
            set_current_admin(&session, &CurrentAdmin { role }).await?;
            set_sentry_admin(role.as_str());
            info!(role = %role, "Admin logged in");
            Ok(Redirect::to("/settings").into_response())
        }
        Err(e) => {
            warn!(error = %e, "Admin login failed");
            let page = LoginTemplate {
                error: Some("Invalid access token.".to_string()),
                role: None,
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip(session))]
async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/auth/login"))
}
