//! Customer authentication.
//!
//! Password login only. A logged-in customer's saved addresses become one
//! of the sources for resolving their country.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use sell_restrict_core::{CountryCandidates, CustomerId};

use crate::db::CustomerRepository;
use crate::models::CurrentCustomer;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CurrentCustomer, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let credentials = self
            .customers
            .get_credentials(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        Ok(CurrentCustomer {
            id: credentials.id,
            email: credentials.email,
        })
    }

    /// Create a customer account with optional saved countries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` for passwords shorter than eight
    /// characters, `AuthError::EmailTaken` if the email is in use.
    pub async fn create_customer(
        &self,
        email: &str,
        password: &str,
        saved: &CountryCandidates,
    ) -> Result<CustomerId, AuthError> {
        let email = email.trim();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
        }
        if self.customers.get_credentials(email).await?.is_some() {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let hash = hash_password(password)?;
        let id = self.customers.create(email, &hash).await?;
        self.customers.save_countries(id, saved).await?;
        Ok(id)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against an Argon2 PHC hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the hash is malformed or does
/// not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
