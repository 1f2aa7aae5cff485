//! Order placement through the storefront router.
//!
//! Every order-placement stage runs on `POST /checkout`; a restricted cart
//! must come back with exactly one consolidated notice.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};

use sell_restrict_core::{CHECKOUT_BLOCKED_MESSAGE, RESTRICTION_NOTICE_TITLE};
use sell_restrict_integration_tests::{
    CHECKOUT_URL, Client, body_text, ids, restriction, storefront,
};

async fn restricted_cart() -> Client {
    let mut client = Client::new(storefront(restriction(&["US"], &[ids::WIDGET])).await);
    client.add_to_cart(ids::WIDGET).await;
    client.add_to_cart(ids::GADGET).await;
    client
}

#[tokio::test]
async fn test_restricted_country_aborts_with_one_notice() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout",
            &[("csrf_token", &token), ("billing_country", "US")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert_eq!(html.matches(RESTRICTION_NOTICE_TITLE).count(), 1);
    assert_eq!(html.matches(CHECKOUT_BLOCKED_MESSAGE).count(), 1);
    assert!(html.contains("<li>Restricted widget</li>"));
    assert!(!html.contains("<li>Plain gadget</li>"));
}

#[tokio::test]
async fn test_allowed_country_hands_off_to_payment() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout",
            &[("csrf_token", &token), ("billing_country", "CA")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], CHECKOUT_URL);
}

#[tokio::test]
async fn test_shipping_country_used_when_billing_is_blank() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout",
            &[
                ("csrf_token", &token),
                ("billing_country", ""),
                ("shipping_country", "US"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_country_is_not_restricted() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client.post_form("/checkout", &[("csrf_token", &token)]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], CHECKOUT_URL);
}

#[tokio::test]
async fn test_country_codes_are_case_sensitive() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout",
            &[("csrf_token", &token), ("billing_country", "us")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_cached_country_applies_without_posted_fields() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client
        .post_form("/account/country", &[("csrf_token", &token), ("country", "US")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client.post_form("/checkout", &[("csrf_token", &token)]).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_profile_from_previous_attempt_is_remembered() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    client
        .post_form(
            "/checkout",
            &[("csrf_token", &token), ("billing_country", "US")],
        )
        .await;

    let html = body_text(client.get("/checkout").await).await;
    assert_eq!(html.matches(RESTRICTION_NOTICE_TITLE).count(), 1);
    assert!(html.contains("restriction-notice"));
    assert!(!html.contains(CHECKOUT_BLOCKED_MESSAGE));
    assert!(html.contains("disabled>Place order"));
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let mut client = restricted_cart().await;
    client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout",
            &[("csrf_token", "forged"), ("billing_country", "CA")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_review_fragment_reports_restriction_once() {
    let mut client = restricted_cart().await;
    let token = client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout/review",
            &[("csrf_token", &token), ("shipping_country", "US")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert_eq!(html.matches(RESTRICTION_NOTICE_TITLE).count(), 1);

    let response = client
        .post_form(
            "/checkout/review",
            &[("csrf_token", &token), ("shipping_country", "CA")],
        )
        .await;
    let html = body_text(response).await;
    assert!(!html.contains(RESTRICTION_NOTICE_TITLE));
}

#[tokio::test]
async fn test_nothing_restricted_without_settings() {
    let mut client = Client::new(storefront(restriction(&[], &[])).await);
    client.add_to_cart(ids::WIDGET).await;
    let token = client.csrf_token().await;

    let response = client
        .post_form(
            "/checkout",
            &[("csrf_token", &token), ("billing_country", "US")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
