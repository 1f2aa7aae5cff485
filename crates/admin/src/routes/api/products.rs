//! Product search for the restricted-products picker.
//!
//! `GET /api/products/search?q=<term>&page=<n>`
//!
//! ```json
//! { "success": true, "data": [{ "id": 42, "text": "Widget (#W-1)" }] }
//! ```

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use sell_restrict_core::sanitize_text_field;

use super::{ApiError, Envelope};
use crate::db::{ProductMatch, ProductRepository};
use crate::middleware::RequireShopManager;
use crate::state::AppState;

/// The only action this endpoint performs.
pub const SEARCH_ACTION: &str = "search_products";

/// Search query. `term` is accepted as an alias of `q`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub action: Option<String>,
    pub q: Option<String>,
    pub term: Option<String>,
    /// Kept as text so a malformed page falls back to the first page.
    pub page: Option<String>,
}

impl SearchQuery {
    fn term(&self) -> String {
        sanitize_text_field(self.q.as_deref().or(self.term.as_deref()).unwrap_or_default())
    }

    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

/// One picker option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: i64,
    pub text: String,
}

impl From<ProductMatch> for SearchResult {
    fn from(product: ProductMatch) -> Self {
        Self {
            text: product.formatted_name(),
            id: product.id.as_i64(),
        }
    }
}

/// Search published products by name or SKU.
///
/// # Errors
///
/// - `401` when not signed in, `403` for roles other than shop manager
/// - `400` for an unknown action
/// - `500` when the catalog cannot be read
#[instrument(skip(state, query))]
pub async fn search(
    State(state): State<AppState>,
    _manager: RequireShopManager,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Envelope<Vec<SearchResult>>>, ApiError> {
    if query.action.as_deref().is_some_and(|a| a != SEARCH_ACTION) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid action."));
    }

    let term = query.term();
    if term.is_empty() {
        return Ok(Json(Envelope::ok(Vec::new())));
    }

    let page = query.page();
    let results: Vec<SearchResult> = ProductRepository::new(state.pool())
        .search(&term, page)
        .await?
        .into_iter()
        .map(SearchResult::from)
        .collect();

    debug!(term = %term, page, results = results.len(), "Product search");
    Ok(Json(Envelope::ok(results)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use serde_json::json;

    use super::*;
    use crate::test_support::{MANAGER_TOKEN, VIEWER_TOKEN, app, body_json, login, send};

    fn get(uri: &str) -> axum::http::request::Builder {
        Request::get(uri)
    }

    #[test]
    fn test_query_term_and_page() {
        let query = SearchQuery {
            term: Some("  <b>wid</b> ".to_string()),
            page: Some("abc".to_string()),
            ..SearchQuery::default()
        };
        assert_eq!(query.term(), "wid");
        assert_eq!(query.page(), 1);

        let query = SearchQuery {
            q: Some("gad".to_string()),
            term: Some("ignored".to_string()),
            page: Some("3".to_string()),
            ..SearchQuery::default()
        };
        assert_eq!(query.term(), "gad");
        assert_eq!(query.page(), 3);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app = app();
        let response = send(
            &app,
            get("/api/products/search?q=wid").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "data": "Authentication required." })
        );
    }

    #[tokio::test]
    async fn test_viewer_is_forbidden() {
        let app = app();
        let response = send(
            &app,
            get("/api/products/search?q=wid")
                .header(header::AUTHORIZATION, format!("Bearer {VIEWER_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "data": "Insufficient permissions." })
        );
    }

    #[tokio::test]
    async fn test_empty_term_returns_empty_list() {
        let app = app();
        let cookie = login(&app, MANAGER_TOKEN).await;

        let response = send(
            &app,
            get("/api/products/search?q=%20%20")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "success": true, "data": [] })
        );
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let app = app();
        let response = send(
            &app,
            get("/api/products/search?action=delete_products&q=wid")
                .header(header::AUTHORIZATION, format!("Bearer {MANAGER_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
