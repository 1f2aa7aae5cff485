//! Checkout route handlers.
//!
//! Every entry point here consults the [`CheckoutGuard`] through a fresh
//! [`RequestContext`], so each request emits at most one consolidated
//! restriction notice no matter how many stages run.
//!
//! [`CheckoutGuard`]: sell_restrict_core::CheckoutGuard

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use sell_restrict_core::{Cart, CheckoutStage, CountryCandidates, Notice, RequestContext};

use crate::error::{AppError, Result};
use crate::middleware::{CsrfToken, OptionalAuth};
use crate::models::{CustomerProfile, session_keys};
use crate::services::{cart as cart_store, location, notices};
use crate::state::AppState;
use crate::views::{CartView, CountryOption, NoticeView, country_options, notice_views};

/// Checkout form fields.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub billing_country: Option<String>,
    #[serde(default)]
    pub shipping_country: Option<String>,
}

impl CheckoutForm {
    fn candidates(&self) -> CountryCandidates {
        CountryCandidates::new(
            self.billing_country.as_deref(),
            self.shipping_country.as_deref(),
        )
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub cart: CartView,
    pub notices: Vec<NoticeView>,
    pub checkout_available: bool,
    pub csrf_token: String,
    pub customer_email: Option<String>,
    pub billing_countries: Vec<CountryOption>,
    pub shipping_countries: Vec<CountryOption>,
}

/// Notices fragment, swapped in after a country change.
#[derive(Template, WebTemplate)]
#[template(path = "partials/notices.html")]
pub struct NoticesTemplate {
    pub notices: Vec<NoticeView>,
}

struct CheckoutPage<'a> {
    cart: &'a Cart,
    notices: Vec<Notice>,
    checkout_available: bool,
    csrf: CsrfToken,
    customer_email: Option<String>,
    profile: CustomerProfile,
}

impl CheckoutPage<'_> {
    fn render(self) -> CheckoutShowTemplate {
        CheckoutShowTemplate {
            cart: CartView::from(self.cart),
            notices: notice_views(&self.notices),
            checkout_available: self.checkout_available,
            csrf_token: self.csrf.0,
            customer_email: self.customer_email,
            billing_countries: country_options(self.profile.billing_country.as_deref()),
            shipping_countries: country_options(self.profile.shipping_country.as_deref()),
        }
    }
}

async fn profile(session: &Session) -> Result<CustomerProfile> {
    Ok(session
        .get::<CustomerProfile>(session_keys::CUSTOMER_PROFILE)
        .await?
        .unwrap_or_default())
}

/// Display the checkout page.
#[instrument(skip(state, session, csrf, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    csrf: CsrfToken,
    OptionalAuth(customer): OptionalAuth,
) -> Result<Response> {
    let cart = cart_store::load(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let resolved = location::resolve(
        &state,
        &session,
        customer.as_ref(),
        CountryCandidates::default(),
    )
    .await?;

    let mut ctx = RequestContext::new();
    state.settings().guard().await?.check(
        CheckoutStage::CartView,
        &mut ctx,
        &cart,
        resolved.as_ref().map(|l| &l.country),
    );

    let mut queued = notices::take(&session).await?;
    let checkout_available = ctx.checkout_available();
    queued.extend(ctx.into_notices());

    let page = CheckoutPage {
        cart: &cart,
        notices: queued,
        checkout_available,
        csrf,
        customer_email: customer.map(|c| c.email),
        profile: profile(&session).await?,
    };
    Ok(page.render().into_response())
}

/// Re-check restrictions after the customer changes a country field.
#[instrument(skip(state, session, csrf, customer, form))]
pub async fn review(
    State(state): State<AppState>,
    session: Session,
    csrf: CsrfToken,
    OptionalAuth(customer): OptionalAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<NoticesTemplate> {
    if !csrf.verify(form.csrf_token.as_deref()) {
        warn!("Checkout review rejected: invalid security token");
        return Err(AppError::Forbidden);
    }

    let posted = form.candidates();
    location::remember_profile(&session, &posted).await?;

    let cart = cart_store::load(&session).await?;
    let resolved = location::resolve(&state, &session, customer.as_ref(), posted).await?;

    let mut ctx = RequestContext::new();
    if !cart.is_empty() {
        state.settings().guard().await?.check(
            CheckoutStage::OrderReview,
            &mut ctx,
            &cart,
            resolved.as_ref().map(|l| &l.country),
        );
    }

    Ok(NoticesTemplate {
        notices: notice_views(ctx.notices()),
    })
}

/// Place the order.
///
/// Runs every order-placement stage. A refusal re-renders the checkout
/// page with the notices; a pass hands off to the payment page.
#[instrument(skip(state, session, csrf, customer, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    csrf: CsrfToken,
    OptionalAuth(customer): OptionalAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if !csrf.verify(form.csrf_token.as_deref()) {
        warn!("Checkout rejected: invalid security token");
        return Err(AppError::Forbidden);
    }

    let cart = cart_store::load(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let posted = form.candidates();
    location::remember_profile(&session, &posted).await?;
    let resolved = location::resolve(&state, &session, customer.as_ref(), posted).await?;

    let mut ctx = RequestContext::new();
    let outcome = state.settings().guard().await?.place_order(
        &mut ctx,
        &cart,
        resolved.as_ref().map(|l| &l.country),
    );

    if outcome.is_abort() {
        let page = CheckoutPage {
            cart: &cart,
            notices: ctx.into_notices(),
            checkout_available: false,
            csrf,
            customer_email: customer.map(|c| c.email),
            profile: profile(&session).await?,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page.render()).into_response());
    }

    info!(
        country = resolved.as_ref().map(|l| l.country.as_str()),
        lines = cart.lines().len(),
        "Checkout passed restriction checks"
    );
    Ok(Redirect::to(state.config().checkout_url.as_str()).into_response())
}
