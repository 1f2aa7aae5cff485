//! Admin authentication service.
//!
//! Admins sign in with one of the configured access tokens. The token
//! decides the role: the manager token grants [`AdminRole::ShopManager`],
//! the optional viewer token grants [`AdminRole::Viewer`]. Comparison is
//! constant-time.

use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::AccessTokens;
use crate::models::AdminRole;

/// Errors from admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token matched no configured role.
    #[error("invalid access token")]
    InvalidToken,
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    tokens: &'a AccessTokens,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(tokens: &'a AccessTokens) -> Self {
        Self { tokens }
    }

    /// Resolve a presented token to a role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token matches neither the
    /// manager nor the viewer token.
    pub fn authenticate(&self, presented: &str) -> Result<AdminRole, AuthError> {
        let presented = presented.trim();
        if presented.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        if tokens_match(presented, self.tokens.manager.expose_secret()) {
            return Ok(AdminRole::ShopManager);
        }
        if let Some(viewer) = &self.tokens.viewer
            && tokens_match(presented, viewer.expose_secret())
        {
            return Ok(AdminRole::Viewer);
        }

        Err(AuthError::InvalidToken)
    }
}

fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    const MANAGER: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";
    const VIEWER: &str = "Zq8*Lm4!Rt6@Wp2#Kd9$Hs1^Gf7&Jb3%";

    fn tokens(viewer: Option<&str>) -> AccessTokens {
        AccessTokens {
            manager: SecretString::from(MANAGER),
            viewer: viewer.map(SecretString::from),
        }
    }

    #[test]
    fn test_manager_token_grants_shop_manager() {
        let tokens = tokens(Some(VIEWER));
        let service = AdminAuthService::new(&tokens);
        assert!(matches!(
            service.authenticate(MANAGER),
            Ok(AdminRole::ShopManager)
        ));
        assert!(matches!(
            service.authenticate(&format!(" {MANAGER}\n")),
            Ok(AdminRole::ShopManager)
        ));
    }

    #[test]
    fn test_viewer_token_grants_viewer() {
        let tokens = tokens(Some(VIEWER));
        let service = AdminAuthService::new(&tokens);
        assert!(matches!(service.authenticate(VIEWER), Ok(AdminRole::Viewer)));
    }

    #[test]
    fn test_unknown_or_empty_token_rejected() {
        let tokens = tokens(None);
        let service = AdminAuthService::new(&tokens);
        assert!(service.authenticate("").is_err());
        assert!(service.authenticate(VIEWER).is_err());
        assert!(service.authenticate(&MANAGER[..10]).is_err());
    }
}
