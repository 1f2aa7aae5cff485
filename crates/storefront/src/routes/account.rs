//! Customer account handlers: login, logout and the country selector.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use sell_restrict_core::CountryCode;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{CsrfToken, OptionalAuth, clear_current_customer, set_current_customer};
use crate::models::session_keys;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Form carrying only the anti-forgery token.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Country selector form data.
#[derive(Debug, Deserialize)]
pub struct CountryForm {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
    pub csrf_token: String,
    pub customer_email: Option<String>,
}

/// Display the login page.
#[instrument(skip(csrf, customer))]
pub async fn login_page(csrf: CsrfToken, OptionalAuth(customer): OptionalAuth) -> LoginTemplate {
    LoginTemplate {
        error: None,
        email: String::new(),
        csrf_token: csrf.0,
        customer_email: customer.map(|c| c.email),
    }
}

/// Handle a login submission.
#[instrument(skip(state, session, csrf, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    csrf: CsrfToken,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if !csrf.verify(form.csrf_token.as_deref()) {
        return Err(AppError::Forbidden);
    }

    match AuthService::new(state.pool())
        .login_with_password(&form.email, &form.password)
        .await
    {
        Ok(customer) => {
            set_current_customer(&session, &customer).await?;
            set_sentry_user(&customer.id, Some(&customer.email));
            info!(customer_id = %customer.id, "Customer logged in");
            Ok(Redirect::to("/cart").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Login failed: invalid credentials");
            let page = LoginTemplate {
                error: Some("Invalid email or password.".to_string()),
                email: form.email,
                csrf_token: csrf.0,
                customer_email: None,
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Log out. Saved addresses stop counting toward the customer's country.
#[instrument(skip(session, csrf, form))]
pub async fn logout(
    session: Session,
    csrf: CsrfToken,
    Form(form): Form<TokenForm>,
) -> Result<Redirect> {
    if !csrf.verify(form.csrf_token.as_deref()) {
        return Err(AppError::Forbidden);
    }

    clear_current_customer(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/cart"))
}

/// Cache the customer's country in the session. A blank value clears it.
#[instrument(skip(session, csrf, form))]
pub async fn set_country(
    session: Session,
    csrf: CsrfToken,
    Form(form): Form<CountryForm>,
) -> Result<Redirect> {
    if !csrf.verify(form.csrf_token.as_deref()) {
        return Err(AppError::Forbidden);
    }

    match CountryCode::parse(&form.country) {
        Ok(country) => {
            session
                .insert(session_keys::CACHED_COUNTRY, country.as_str())
                .await?;
            info!(country = %country, "Cached customer country");
        }
        Err(_) => {
            session
                .remove::<String>(session_keys::CACHED_COUNTRY)
                .await?;
        }
    }

    Ok(Redirect::to("/cart"))
}
