//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during customer login or account creation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too short.
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    /// Another customer uses this email.
    #[error("a customer with email {0} already exists")]
    EmailTaken(String),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
