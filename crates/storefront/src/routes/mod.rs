//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Products
//! GET  /products/{id}                     - Product page
//! GET  /products/{id}/restriction-notice  - Restriction notice fragment (204 if none)
//!
//! # Cart
//! GET  /cart                   - Cart page (runs the cart-view check)
//! POST /cart/add               - Add a product or variation
//! POST /cart/remove            - Remove one line
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout page (runs the cart-view check)
//! POST /checkout/review        - Re-check after a country change (notices fragment)
//! POST /checkout               - Place order (runs every order-placement stage)
//!
//! # Account
//! GET  /account/login          - Login page
//! POST /account/login          - Login action
//! POST /account/logout         - Logout action
//! POST /account/country        - Cache the customer's country in the session
//!
//! # API
//! POST /api/cart/remove-restricted - Remove restricted products (JSON)
//! ```

pub mod account;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/restriction-notice", get(products::restriction_notice))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/review", post(checkout::review))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(account::login_page).post(account::login))
        .route("/logout", post(account::logout))
        .route("/country", post(account::set_country))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route(
        "/cart/remove-restricted",
        post(api::restrictions::remove_restricted),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/cart") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/account", account_routes())
        .nest("/api", api_routes())
}
