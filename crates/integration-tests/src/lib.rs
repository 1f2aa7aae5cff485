//! Integration tests for Sell Restrict.
//!
//! # Running Tests
//!
//! ```bash
//! # Router tests (no database needed)
//! cargo test -p sell-restrict-integration-tests
//!
//! # Database tests
//! DATABASE_URL=postgres://localhost/sell_restrict_test \
//!     cargo test -p sell-restrict-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `restriction_rules` - Core rules from a stored settings record
//! - `checkout_restriction` - Order placement through the storefront router
//! - `cart_notice` - Cart page notice and the removal endpoint
//! - `product_notice` - Product page notices
//! - `admin_access` - Admin login and role checks
//! - `database` - Settings Store and catalog search against `PostgreSQL`
//!
//! Router tests run both binaries' routers in-process over a pool that never
//! connects. Settings and catalog entries are primed into the storefront's
//! caches, so only paths that stay off the database can be exercised there.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{Request, header, request::Builder},
    response::Response,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::Value;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use sell_restrict_core::{CountryCode, DEFAULT_RESTRICTION_MESSAGE, ProductId, RestrictionConfig};
use sell_restrict_storefront::db::{ProductKind, ProductRecord};

/// Payment page orders are handed off to when they pass.
pub const CHECKOUT_URL: &str = "https://pay.example.test/checkout";

pub const MANAGER_TOKEN: &str = "mN4!qR8@vX2#kL6$wT9^bH3&dJ7*fP5%";
pub const VIEWER_TOKEN: &str = "Yt5@Gc8!Pn2#Vx7$Lq4^Ds9&Kw3*Hm6%";

/// Catalog fixture ids.
pub mod ids {
    /// Simple product, usually restricted.
    pub const WIDGET: i64 = 42;
    /// Simple product, never restricted.
    pub const GADGET: i64 = 7;
    /// Variable product.
    pub const SHIRT: i64 = 50;
    pub const SHIRT_SMALL: i64 = 51;
    pub const SHIRT_LARGE: i64 = 52;
}

/// A pool that never connects.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .unwrap()
}

/// Restriction settings over the fixture catalog.
pub fn restriction(countries: &[&str], products: &[i64]) -> RestrictionConfig {
    RestrictionConfig {
        restricted_countries: countries
            .iter()
            .map(|c| CountryCode::parse(c).unwrap())
            .collect(),
        restricted_product_ids: products.iter().copied().map(ProductId::new).collect(),
        restriction_message: DEFAULT_RESTRICTION_MESSAGE.to_string(),
    }
}

fn record(id: i64, parent: Option<i64>, kind: ProductKind, name: &str, cents: i64) -> ProductRecord {
    ProductRecord {
        id: ProductId::new(id),
        parent_id: parent.map(ProductId::new),
        kind,
        name: name.to_string(),
        sku: Some(format!("SKU-{id}")),
        price: Decimal::new(cents, 2),
    }
}

/// Storefront router with `config` and the fixture catalog primed.
pub async fn storefront(config: RestrictionConfig) -> Router {
    use sell_restrict_storefront::{config::StorefrontConfig, middleware, state::AppState};

    let state = AppState::new(
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            checkout_url: CHECKOUT_URL.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        },
        lazy_pool(),
    );

    state.settings().prime(config).await;
    let catalog = state.catalog();
    let widget = record(ids::WIDGET, None, ProductKind::Simple, "Restricted widget", 1999);
    let gadget = record(ids::GADGET, None, ProductKind::Simple, "Plain gadget", 500);
    let shirt = record(ids::SHIRT, None, ProductKind::Variable, "Shirt", 0);
    let sizes = vec![
        record(ids::SHIRT_SMALL, Some(ids::SHIRT), ProductKind::Variation, "Shirt - Small", 2500),
        record(ids::SHIRT_LARGE, Some(ids::SHIRT), ProductKind::Variation, "Shirt - Large", 2700),
    ];
    catalog.prime(widget, Vec::new()).await;
    catalog.prime(gadget, Vec::new()).await;
    catalog.prime(shirt, sizes).await;

    sell_restrict_storefront::app(state, middleware::session_layer(MemoryStore::default(), false))
}

/// Admin router with a manager and a viewer token configured.
pub fn admin() -> Router {
    use sell_restrict_admin::{
        config::{AccessTokens, AdminConfig},
        middleware,
        state::AppState,
    };

    let state = AppState::new(
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            access: AccessTokens {
                manager: SecretString::from(MANAGER_TOKEN),
                viewer: Some(SecretString::from(VIEWER_TOKEN)),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        },
        lazy_pool(),
    );

    sell_restrict_admin::app(state, middleware::session_layer(MemoryStore::default(), false))
}

/// A browser stand-in: keeps the session cookie between requests.
pub struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn send(&mut self, mut request: Builder, body: Body) -> Response {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::get(uri), Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    pub async fn post_json(&mut self, uri: &str, body: &Value) -> Response {
        self.send(
            Request::post(uri).header(header::CONTENT_TYPE, "application/json"),
            Body::from(body.to_string()),
        )
        .await
    }

    /// Add a product or variation to the session cart.
    pub async fn add_to_cart(&mut self, product_id: i64) {
        let id = product_id.to_string();
        let response = self
            .post_form("/cart/add", &[("product_id", &id), ("quantity", "1")])
            .await;
        assert!(response.status().is_redirection(), "add to cart failed: {}", response.status());
    }

    /// The session's anti-forgery token, read from the cart page.
    pub async fn csrf_token(&mut self) -> String {
        let html = body_text(self.get("/cart").await).await;
        meta_csrf_token(&html).unwrap()
    }
}

/// Content of `<meta name="csrf-token" content="...">`.
#[must_use]
pub fn meta_csrf_token(html: &str) -> Option<String> {
    let marker = r#"<meta name="csrf-token" content=""#;
    let start = html.find(marker)? + marker.len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(str::to_string)
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_csrf_token() {
        let html = r#"<head><meta name="csrf-token" content="abc-_123"></head>"#;
        assert_eq!(meta_csrf_token(html).as_deref(), Some("abc-_123"));
        assert_eq!(meta_csrf_token("<head></head>"), None);
    }
}
