//! Storefront customer management.

use sell_restrict_core::{CountryCandidates, CountryCode};
use sell_restrict_storefront::services::auth::AuthService;

use super::connect;

/// Create a customer with optional saved billing and shipping countries.
///
/// # Errors
///
/// Returns an error if the password is too short, the email is taken, or
/// the database cannot be written.
pub async fn create(
    email: &str,
    password: &str,
    billing_country: Option<&str>,
    shipping_country: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(format!("Invalid email: {email}").into());
    }

    let pool = connect().await?;
    let saved = CountryCandidates {
        billing: CountryCode::from_optional(billing_country).map(|c| c.as_str().to_string()),
        shipping: CountryCode::from_optional(shipping_country).map(|c| c.as_str().to_string()),
    };

    let id = AuthService::new(&pool)
        .create_customer(email, password, &saved)
        .await?;

    tracing::info!("Customer created successfully! ID: {}, Email: {}", id, email);
    Ok(())
}
