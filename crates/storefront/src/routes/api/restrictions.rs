//! Removing restricted products from the cart.
//!
//! `POST /api/cart/remove-restricted`
//!
//! ```json
//! { "action": "remove_restricted_products", "product_ids": [42, "51"], "nonce": "..." }
//! ```
//!
//! The nonce is checked first, then the id list; the cart is only touched
//! once both pass, so a rejected request never removes anything.

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use sell_restrict_core::{RemovalSummary, parse_product_ids, remove_product_lines};

use super::{ApiError, Envelope};
use crate::middleware::CsrfToken;
use crate::services::cart as cart_store;

/// The only action this endpoint performs.
pub const REMOVE_ACTION: &str = "remove_restricted_products";

/// Removal request body. Every field is optional so that a missing field is
/// reported as a validation failure rather than a decoding failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveRestrictedRequest {
    pub action: Option<String>,
    #[serde(alias = "productIds")]
    pub product_ids: Option<Value>,
    pub nonce: Option<String>,
}

/// Remove every cart line whose product or variation id was posted.
///
/// # Errors
///
/// - `403` when the nonce is missing or wrong (including unreadable bodies)
/// - `400` when the action is unknown or the ids are not a non-empty list
///   of integers
/// - `500` when the session store fails
#[instrument(skip(session, payload))]
pub async fn remove_restricted(
    session: Session,
    payload: Result<Json<RemoveRestrictedRequest>, JsonRejection>,
) -> Result<Json<Envelope<RemovalSummary>>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable removal request");
            RemoveRestrictedRequest::default()
        }
    };

    let csrf = CsrfToken::for_session(&session).await?;
    if !csrf.verify(request.nonce.as_deref()) {
        warn!("Removal rejected: invalid security token");
        return Err(ApiError::invalid_nonce());
    }

    if request.action.as_deref().is_some_and(|a| a != REMOVE_ACTION) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid action."));
    }

    let ids = parse_product_ids(request.product_ids.as_ref())
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut cart = cart_store::load(&session).await?;
    let summary = remove_product_lines(&mut cart, &ids);
    if !summary.removed_items.is_empty() {
        cart_store::save(&session, &cart).await?;
    }

    info!(
        requested = ids.len(),
        removed = summary.removed_items.len(),
        "Removed restricted products from cart"
    );
    Ok(Json(Envelope::ok(summary)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        response::Response,
        routing::{get, post},
    };
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use serde_json::json;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use sell_restrict_core::{Cart, CurrencyCode, Price, ProductId};

    use super::*;
    use crate::middleware::session_layer;

    async fn seed(session: Session) -> String {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        let mut cart = Cart::new(CurrencyCode::USD);
        cart.add(ProductId::new(42), None, 1, "Restricted widget", price);
        cart.add(ProductId::new(7), None, 2, "Plain gadget", price);
        cart.add(
            ProductId::new(50),
            Some(ProductId::new(51)),
            1,
            "Shirt - Small",
            price,
        );
        cart_store::save(&session, &cart).await.unwrap();
        CsrfToken::for_session(&session).await.unwrap().0
    }

    async fn line_names(session: Session) -> Json<Vec<String>> {
        let cart = cart_store::load(&session).await.unwrap();
        Json(
            cart.lines()
                .iter()
                .map(|l| l.display_name.clone())
                .collect(),
        )
    }

    fn app() -> Router {
        Router::new()
            .route("/seed", get(seed))
            .route("/lines", get(line_names))
            .route("/api/cart/remove-restricted", post(remove_restricted))
            .layer(session_layer(MemoryStore::default(), false))
    }

    fn cookie(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Seed a session and return `(cookie, nonce)`.
    async fn start(app: &Router) -> (String, String) {
        let response = app
            .clone()
            .oneshot(Request::get("/seed").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = cookie(&response);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (cookie, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_json(app: &Router, cookie: &str, body: impl Into<Body>) -> Response {
        app.clone()
            .oneshot(
                Request::post("/api/cart/remove-restricted")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn remaining(app: &Router, cookie: &str) -> Vec<String> {
        let response = app
            .clone()
            .oneshot(
                Request::get("/lines")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        serde_json::from_value(body_json(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_removes_only_requested_lines() {
        let app = app();
        let (cookie, nonce) = start(&app).await;

        let body = json!({
            "action": REMOVE_ACTION,
            "product_ids": [42],
            "nonce": nonce,
        });
        let response = post_json(&app, &cookie, body.to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": true,
                "data": {
                    "message": "Removed restricted items: Restricted widget",
                    "removedItems": ["Restricted widget"],
                },
            })
        );

        assert_eq!(
            remaining(&app, &cookie).await,
            vec!["Plain gadget".to_string(), "Shirt - Small".to_string()]
        );
    }

    #[tokio::test]
    async fn test_variation_id_and_camel_case_alias() {
        let app = app();
        let (cookie, nonce) = start(&app).await;

        let body = json!({ "productIds": ["51"], "nonce": nonce });
        let response = post_json(&app, &cookie, body.to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            remaining(&app, &cookie).await,
            vec!["Restricted widget".to_string(), "Plain gadget".to_string()]
        );
    }

    #[tokio::test]
    async fn test_absent_id_is_a_successful_no_op() {
        let app = app();
        let (cookie, nonce) = start(&app).await;

        let body = json!({ "product_ids": [999], "nonce": nonce });
        let response = post_json(&app, &cookie, body.to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["removedItems"], json!([]));
        assert_eq!(remaining(&app, &cookie).await.len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_nonce_is_rejected_before_mutation() {
        let app = app();
        let (cookie, _) = start(&app).await;

        let body = json!({ "product_ids": [42], "nonce": "forged" });
        let response = post_json(&app, &cookie, body.to_string()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "data": "Invalid security token." })
        );
        assert_eq!(remaining(&app, &cookie).await.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_body_counts_as_missing_nonce() {
        let app = app();
        let (cookie, _) = start(&app).await;

        let response = post_json(&app, &cookie, "{not json").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_ids_remove_nothing() {
        let app = app();
        let (cookie, nonce) = start(&app).await;

        for ids in [json!([42, "abc"]), json!([]), json!("42"), json!(null)] {
            let body = json!({ "product_ids": ids, "nonce": nonce });
            let response = post_json(&app, &cookie, body.to_string()).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({ "success": false, "data": "Invalid product IDs." })
            );
        }
        assert_eq!(remaining(&app, &cookie).await.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let app = app();
        let (cookie, nonce) = start(&app).await;

        let body = json!({ "action": "empty_cart", "product_ids": [42], "nonce": nonce });
        let response = post_json(&app, &cookie, body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(remaining(&app, &cookie).await.len(), 3);
    }
}
