//! Restriction settings page.
//!
//! The form always submits every field, so a save replaces the whole
//! configuration: deselecting every country or product clears that list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::Redirect,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};

use sell_restrict_core::{COUNTRIES, CountryCode, ProductId, SettingsUpdate};

use crate::db::{ProductMatch, ProductRepository};
use crate::error::Result;
use crate::middleware::{RequireAdminAuth, RequireShopManager};
use crate::services::SettingsStore;
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(index).post(save))
}

/// One entry of the country multiselect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOption {
    pub code: String,
    pub name: String,
    pub selected: bool,
}

/// A restricted product pre-populated in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProduct {
    pub id: i64,
    pub text: String,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub role: Option<String>,
    pub can_manage: bool,
    pub countries: Vec<CountryOption>,
    pub products: Vec<SelectedProduct>,
    pub message: String,
    pub saved: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndexQuery {
    pub updated: Option<String>,
}

/// Display the settings page.
///
/// GET /settings
#[instrument(skip(state, admin, query))]
async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<IndexQuery>,
) -> Result<SettingsTemplate> {
    let config = SettingsStore::new(state.pool()).get().await?;
    let found = ProductRepository::new(state.pool())
        .find_by_ids(&config.restricted_product_ids)
        .await?;

    Ok(SettingsTemplate {
        role: Some(admin.role.to_string()),
        can_manage: admin.role.can_manage(),
        countries: country_options(&config.restricted_countries),
        products: selected_products(&config.restricted_product_ids, found),
        message: config.restriction_message,
        saved: query.updated.is_some(),
    })
}

/// Save the settings form.
///
/// POST /settings
#[instrument(skip(state, _manager, fields))]
async fn save(
    State(state): State<AppState>,
    _manager: RequireShopManager,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let update = update_from_form(fields);
    let config = SettingsStore::new(state.pool()).save(&update).await?;

    info!(
        countries = config.restricted_countries.len(),
        products = config.restricted_product_ids.len(),
        "Restriction settings updated"
    );
    Ok(Redirect::to("/settings?updated=true"))
}

/// Every known country, with the restricted ones selected. Restricted codes
/// that are not in the country list are appended so they stay selected.
fn country_options(restricted: &[CountryCode]) -> Vec<CountryOption> {
    let mut options: Vec<CountryOption> = COUNTRIES
        .iter()
        .map(|(code, name)| CountryOption {
            code: (*code).to_string(),
            name: (*name).to_string(),
            selected: restricted.iter().any(|c| c.as_str() == *code),
        })
        .collect();

    for code in restricted {
        if !COUNTRIES.iter().any(|(known, _)| *known == code.as_str()) {
            options.push(CountryOption {
                code: code.as_str().to_string(),
                name: code.as_str().to_string(),
                selected: true,
            });
        }
    }

    options
}

/// Restricted products in configured order. Ids no longer in the catalog
/// are shown as `#id` so saving the form does not silently drop them.
fn selected_products(ids: &[ProductId], found: Vec<ProductMatch>) -> Vec<SelectedProduct> {
    ids.iter()
        .map(|id| {
            let text = found
                .iter()
                .find(|p| p.id == *id)
                .map_or_else(|| format!("#{id}"), ProductMatch::formatted_name);
            SelectedProduct {
                id: id.as_i64(),
                text,
            }
        })
        .collect()
}

/// Collect the submitted form into a full update. Both `name` and `name[]`
/// spellings are accepted for the list fields; unknown fields are ignored.
fn update_from_form(fields: Vec<(String, String)>) -> SettingsUpdate {
    let mut countries = Vec::new();
    let mut products = Vec::new();
    let mut message = None;

    for (name, value) in fields {
        match name.trim_end_matches("[]") {
            "restricted_countries" => countries.push(value),
            "restricted_products" => products.push(value),
            "restriction_message" => message = Some(value),
            _ => {}
        }
    }

    SettingsUpdate {
        restricted_countries: Some(countries),
        restricted_products: Some(products),
        restriction_message: message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };

    use super::*;
    use crate::test_support::{VIEWER_TOKEN, app, body_text, login, send};

    #[test]
    fn test_country_options_keep_unknown_codes_selected() {
        let restricted = vec![
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("ZZ").unwrap(),
        ];
        let options = country_options(&restricted);

        assert_eq!(options.len(), COUNTRIES.len() + 1);
        let us = options.iter().find(|o| o.code == "US").unwrap();
        assert!(us.selected);
        assert!(!options.iter().find(|o| o.code == "CA").unwrap().selected);
        assert_eq!(
            options.last().unwrap(),
            &CountryOption {
                code: "ZZ".to_string(),
                name: "ZZ".to_string(),
                selected: true,
            }
        );
    }

    #[test]
    fn test_selected_products_keep_order_and_missing_ids() {
        let found = vec![ProductMatch {
            id: ProductId::new(42),
            name: "Widget".to_string(),
            sku: Some("W-1".to_string()),
        }];
        let products = selected_products(&[ProductId::new(7), ProductId::new(42)], found);

        assert_eq!(
            products,
            vec![
                SelectedProduct {
                    id: 7,
                    text: "#7".to_string()
                },
                SelectedProduct {
                    id: 42,
                    text: "Widget (#W-1)".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_form_is_a_full_update() {
        let update = update_from_form(vec![
            ("restricted_countries[]".to_string(), "US".to_string()),
            ("restricted_countries[]".to_string(), "CA".to_string()),
            ("restriction_message".to_string(), "<p>No</p>".to_string()),
            ("submit".to_string(), "Save".to_string()),
        ]);

        assert_eq!(
            update.restricted_countries,
            Some(vec!["US".to_string(), "CA".to_string()])
        );
        assert_eq!(update.restricted_products, Some(Vec::new()));
        assert_eq!(update.restriction_message.as_deref(), Some("<p>No</p>"));
    }

    #[tokio::test]
    async fn test_settings_page_requires_login() {
        let app = app();
        let response = send(&app, Request::get("/settings").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_viewer_cannot_save() {
        let app = app();
        let cookie = login(&app, VIEWER_TOKEN).await;

        let response = send(
            &app,
            Request::post("/settings")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("restricted_countries%5B%5D=US"))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("cannot change"));
    }
}
