//! Product page handlers.
//!
//! A product page shows the restriction notice when the product, or any of
//! its variations, is on the restricted list and at least one country is
//! configured. The notice does not depend on the visitor's own country.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use sell_restrict_core::{CurrencyCode, Price, ProductId, ProductNotice};

use crate::db::{ProductKind, ProductRecord};
use crate::error::{AppError, Result};
use crate::middleware::{CsrfToken, OptionalAuth};
use crate::state::AppState;

/// Restriction notice for display.
#[derive(Debug, Clone)]
pub struct ProductNoticeView {
    /// Sanitized rich text.
    pub message_html: String,
    pub countries: String,
}

impl From<ProductNotice> for ProductNoticeView {
    fn from(notice: ProductNotice) -> Self {
        Self {
            countries: notice.countries_label(),
            message_html: notice.message,
        }
    }
}

/// A purchasable option on the product page.
#[derive(Debug, Clone)]
pub struct PurchaseOption {
    pub id: i64,
    pub name: String,
    pub price: String,
}

impl From<&ProductRecord> for PurchaseOption {
    fn from(product: &ProductRecord) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: Price::new(product.price, CurrencyCode::USD).to_string(),
        }
    }
}

/// Product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub name: String,
    pub sku: Option<String>,
    pub options: Vec<PurchaseOption>,
    pub notice: Option<ProductNoticeView>,
    pub csrf_token: String,
    pub customer_email: Option<String>,
}

/// Restriction notice fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_notice.html")]
pub struct ProductNoticeTemplate {
    pub notice: ProductNoticeView,
}

struct LoadedProduct {
    product: Arc<ProductRecord>,
    variation_ids: Arc<[ProductId]>,
}

async fn load(state: &AppState, raw_id: &str) -> Result<LoadedProduct> {
    let id = ProductId::parse_absolute(raw_id)
        .filter(ProductId::is_valid)
        .ok_or_else(|| AppError::NotFound(format!("product {raw_id}")))?;

    let product = state
        .catalog()
        .product(id)
        .await?
        .filter(|p| p.kind != ProductKind::Variation)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let variation_ids = if product.kind == ProductKind::Variable {
        state.catalog().variation_ids(product.id).await?
    } else {
        Arc::from(Vec::new())
    };

    Ok(LoadedProduct {
        product,
        variation_ids,
    })
}

async fn notice_for(state: &AppState, loaded: &LoadedProduct) -> Result<Option<ProductNotice>> {
    let guard = state.settings().guard().await?;
    Ok(guard
        .evaluator()
        .product_notice(loaded.product.id, &loaded.variation_ids))
}

/// Display a product page.
#[instrument(skip(state, csrf, customer))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    csrf: CsrfToken,
    OptionalAuth(customer): OptionalAuth,
) -> Result<ProductShowTemplate> {
    let loaded = load(&state, &id).await?;
    let notice = notice_for(&state, &loaded).await?;

    let mut options = Vec::new();
    if loaded.product.kind == ProductKind::Variable {
        for variation_id in loaded.variation_ids.iter() {
            if let Some(variation) = state.catalog().product(*variation_id).await? {
                options.push(PurchaseOption::from(variation.as_ref()));
            }
        }
    } else if loaded.product.kind.is_purchasable() {
        options.push(PurchaseOption::from(loaded.product.as_ref()));
    }

    Ok(ProductShowTemplate {
        name: loaded.product.name.clone(),
        sku: loaded.product.sku.clone(),
        options,
        notice: notice.map(ProductNoticeView::from),
        csrf_token: csrf.0,
        customer_email: customer.map(|c| c.email),
    })
}

/// Restriction notice fragment for a product. `204` when none applies.
#[instrument(skip(state))]
pub async fn restriction_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let loaded = load(&state, &id).await?;

    Ok(match notice_for(&state, &loaded).await? {
        Some(notice) => ProductNoticeTemplate {
            notice: notice.into(),
        }
        .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
