//! Session-backed cart storage.
//!
//! The cart lives in the customer's session; handlers load it, mutate it
//! through the core [`Cart`] API, and save it back.

use tower_sessions::Session;

use sell_restrict_core::Cart;

use crate::models::session_keys;

/// Load the session cart, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Save the cart back into the session.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}
