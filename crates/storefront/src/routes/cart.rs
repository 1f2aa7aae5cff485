//! Cart route handlers.
//!
//! The cart lives in the session. Viewing it runs the checkout guard's
//! cart-view stage: restricted lines produce one inline notice that the
//! client script turns into a "remove restricted products" prompt, and the
//! checkout link is disabled.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use sell_restrict_core::{
    CheckoutStage, CountryCandidates, LineKey, Notice, Price, ProductId, RequestContext,
};

use crate::error::{AppError, Result};
use crate::middleware::{CsrfToken, OptionalAuth};
use crate::models::session_keys;
use crate::services::{cart as cart_store, location, notices};
use crate::state::AppState;
use crate::views::{CartView, CountryOption, NoticeView, country_options, notice_views};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    /// Product or variation id.
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_key: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notices: Vec<NoticeView>,
    pub checkout_available: bool,
    pub csrf_token: String,
    pub customer_email: Option<String>,
    pub countries: Vec<CountryOption>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(state, session, csrf, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    csrf: CsrfToken,
    OptionalAuth(customer): OptionalAuth,
) -> Result<CartShowTemplate> {
    let cart = cart_store::load(&session).await?;
    let resolved = location::resolve(
        &state,
        &session,
        customer.as_ref(),
        CountryCandidates::default(),
    )
    .await?;

    let mut queued = notices::take(&session).await?;
    let mut ctx = RequestContext::new();
    if !cart.is_empty() {
        let guard = state.settings().guard().await?;
        guard.check(
            CheckoutStage::CartView,
            &mut ctx,
            &cart,
            resolved.as_ref().map(|l| &l.country),
        );
    }
    let checkout_available = ctx.checkout_available();
    queued.extend(ctx.into_notices());

    let cached_country = session
        .get::<String>(session_keys::CACHED_COUNTRY)
        .await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        notices: notice_views(&queued),
        checkout_available,
        csrf_token: csrf.0,
        customer_email: customer.map(|c| c.email),
        countries: country_options(cached_country.as_deref()),
    })
}

/// Add a product or variation to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::parse_absolute(&form.product_id)
        .filter(ProductId::is_valid)
        .ok_or_else(|| AppError::BadRequest("invalid product id".to_string()))?;

    let product = state
        .catalog()
        .product(id)
        .await?
        .filter(|p| p.kind.is_purchasable())
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let (product_id, variation_id) = match product.parent_id {
        Some(parent) => (parent, Some(product.id)),
        None => (product.id, None),
    };

    let mut cart = cart_store::load(&session).await?;
    let unit_price = Price::new(product.price, cart.currency_code());
    cart.add(
        product_id,
        variation_id,
        form.quantity.unwrap_or(1),
        product.name.clone(),
        unit_price,
    );
    cart_store::save(&session, &cart).await?;

    info!(product_id = %product_id, variation_id = ?variation_id, "Added to cart");
    notices::queue(
        &session,
        [Notice::success(format!(
            "\u{201c}{}\u{201d} has been added to your cart.",
            product.name
        ))],
    )
    .await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a single line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = cart_store::load(&session).await?;

    if let Some(line) = cart.remove_line(&LineKey::from(form.line_key)) {
        cart.calculate_totals();
        cart_store::save(&session, &cart).await?;
        notices::queue(
            &session,
            [Notice::success(format!(
                "\u{201c}{}\u{201d} removed.",
                line.display_name
            ))],
        )
        .await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = cart_store::load(&session).await?;
    Ok(CartCountTemplate {
        count: cart.totals().item_count,
    })
}
