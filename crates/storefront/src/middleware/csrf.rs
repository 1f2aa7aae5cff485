//! Anti-forgery tokens for state-changing storefront requests.
//!
//! Each session gets one random token (256-bit, URL-safe base64). Pages
//! embed it; the removal endpoint and checkout submission compare the
//! submitted value in constant time before touching anything.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use subtle::ConstantTimeEq;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// The current session's anti-forgery token.
#[derive(Clone, Debug)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    /// Generate a new random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Whether `submitted` matches this token.
    #[must_use]
    pub fn verify(&self, submitted: Option<&str>) -> bool {
        submitted.is_some_and(|s| {
            !s.is_empty() && bool::from(self.0.as_bytes().ct_eq(s.as_bytes()))
        })
    }

    /// Fetch the session's token, creating one on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn for_session(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        if let Some(token) = session.get::<String>(session_keys::CSRF_TOKEN).await? {
            return Ok(Self(token));
        }
        let token = Self::generate();
        session.insert(session_keys::CSRF_TOKEN, &token.0).await?;
        Ok(token)
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;
        Ok(Self::for_session(session).await?)
    }
}
