//! Product page restriction notices.
//!
//! The notice depends on the settings and the product only, never on the
//! visitor's country.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use sell_restrict_integration_tests::{Client, body_text, ids, restriction, storefront};

async fn notice(countries: &[&str], products: &[i64], id: i64) -> (StatusCode, String) {
    let mut client = Client::new(storefront(restriction(countries, products)).await);
    let response = client.get(&format!("/products/{id}/restriction-notice")).await;
    let status = response.status();
    (status, body_text(response).await)
}

#[tokio::test]
async fn test_listed_product_names_countries() {
    let (status, html) = notice(&["US", "CA"], &[ids::WIDGET], ids::WIDGET).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("product-restriction-notice"));
    assert!(html.contains("Restricted in: United States (US), Canada"));
}

#[tokio::test]
async fn test_unlisted_product_has_no_notice() {
    let (status, html) = notice(&["US"], &[ids::WIDGET], ids::GADGET).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(html.is_empty());
}

#[tokio::test]
async fn test_variable_product_with_listed_variation() {
    let (status, _) = notice(&["US"], &[ids::SHIRT_LARGE], ids::SHIRT).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_no_countries_configured_means_no_notice() {
    let (status, _) = notice(&[], &[ids::WIDGET], ids::WIDGET).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_variation_has_no_page_of_its_own() {
    let (status, _) = notice(&["US"], &[ids::SHIRT_SMALL], ids::SHIRT_SMALL).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_page_embeds_notice() {
    let mut client = Client::new(storefront(restriction(&["US"], &[ids::WIDGET])).await);

    let response = client.get(&format!("/products/{}", ids::WIDGET)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Restricted widget"));
    assert!(html.contains("product-restriction-notice"));

    let response = client.get(&format!("/products/{}", ids::GADGET)).await;
    let html = body_text(response).await;
    assert!(!html.contains("product-restriction-notice"));
}
