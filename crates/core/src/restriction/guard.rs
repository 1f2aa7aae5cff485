//! Checkout guard.
//!
//! Several points in the checkout flow ask the same question ("may this
//! cart be bought from here?"). Each request carries a [`RequestContext`];
//! the first stage that finds restricted items queues the notices and sets
//! the context's latch, and every later stage in that request reuses the
//! result without queueing anything else. A new request starts with a fresh
//! context, so the latch never leaks between requests.

use core::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::config::RestrictionConfig;
use super::evaluator::{RestrictedItem, RestrictionEvaluator};
use crate::types::{Cart, CountryCode, Notice, NoticeBody};

/// Points in the checkout flow that consult the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStage {
    /// Cart or checkout page render. Informs, never aborts.
    CartView,
    /// Validation before an order is attempted.
    BeforeCheckout,
    /// Order placement.
    CheckoutProcess,
    /// Order review refresh (address or shipping changes).
    OrderReview,
    /// After the order has been assembled, just before hand-off.
    OrderProcessed,
}

impl CheckoutStage {
    /// Stages run, in order, when an order is placed.
    pub const PLACE_ORDER: [Self; 3] = [
        Self::BeforeCheckout,
        Self::CheckoutProcess,
        Self::OrderProcessed,
    ];

    /// Whether a restriction at this stage refuses the order.
    #[must_use]
    pub const fn aborts(self) -> bool {
        !matches!(self, Self::CartView)
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CartView => "cart_view",
            Self::BeforeCheckout => "before_checkout",
            Self::CheckoutProcess => "checkout_process",
            Self::OrderReview => "order_review",
            Self::OrderProcessed => "order_processed",
        })
    }
}

/// Evaluation state for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Idle,
    /// Evaluated, nothing restricted.
    Clear,
    /// Evaluated, restricted items present.
    Blocked,
}

/// Request-scoped guard state: the notice latch and the notices queued for
/// the next render.
#[derive(Debug, Default)]
pub struct RequestContext {
    state: GuardState,
    notice_emitted: bool,
    notices: Vec<Notice>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Whether a restriction notice has already been queued in this request.
    #[must_use]
    pub const fn notice_emitted(&self) -> bool {
        self.notice_emitted
    }

    /// Whether the customer may proceed to checkout.
    #[must_use]
    pub fn checkout_available(&self) -> bool {
        self.state != GuardState::Blocked
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Consume the context, returning queued notices in order.
    #[must_use]
    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}

/// Result of one guard invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Nothing restricted.
    Proceed,
    /// Restricted items present; checkout is unavailable but this stage
    /// does not refuse anything.
    Restricted,
    /// Restricted items present; the order must not be created.
    Abort,
}

impl GuardOutcome {
    #[must_use]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Abort)
    }
}

/// Runs the evaluator at each checkout stage and emits notices.
#[derive(Debug, Clone)]
pub struct CheckoutGuard {
    evaluator: RestrictionEvaluator,
}

impl CheckoutGuard {
    #[must_use]
    pub const fn new(evaluator: RestrictionEvaluator) -> Self {
        Self { evaluator }
    }

    /// Build a guard directly from a configuration.
    #[must_use]
    pub const fn from_config(config: Arc<RestrictionConfig>) -> Self {
        Self::new(RestrictionEvaluator::new(config))
    }

    #[must_use]
    pub const fn evaluator(&self) -> &RestrictionEvaluator {
        &self.evaluator
    }

    /// Consult the guard at `stage`.
    ///
    /// Once the context's latch is set, later calls queue nothing and
    /// report the earlier result for their own stage.
    pub fn check(
        &self,
        stage: CheckoutStage,
        ctx: &mut RequestContext,
        cart: &Cart,
        location: Option<&CountryCode>,
    ) -> GuardOutcome {
        if ctx.notice_emitted {
            debug!(stage = %stage, "Restriction notice already emitted for this request");
            return Self::outcome(stage, ctx.state);
        }

        let items = self.evaluator.find_restricted_items(cart, location);
        if items.is_empty() {
            ctx.state = GuardState::Clear;
            return GuardOutcome::Proceed;
        }

        let message = self.evaluator.config().restriction_message.clone();
        if stage.aborts() {
            ctx.notices.push(Notice::error(NoticeBody::RestrictionSummary {
                message,
                product_names: items.iter().map(|i| i.display_name.clone()).collect(),
            }));
            ctx.notices.push(Notice::error(NoticeBody::CheckoutBlocked));
        } else {
            ctx.notices.push(Notice::notice(NoticeBody::CartRestriction {
                message,
                lines: items.iter().map(RestrictedItem::to_notice_line).collect(),
            }));
        }

        info!(
            stage = %stage,
            country = location.map(CountryCode::as_str),
            restricted = items.len(),
            "Checkout restricted"
        );

        ctx.notice_emitted = true;
        ctx.state = GuardState::Blocked;
        Self::outcome(stage, ctx.state)
    }

    /// Run every order-placement stage in order. Stops at the first abort.
    pub fn place_order(
        &self,
        ctx: &mut RequestContext,
        cart: &Cart,
        location: Option<&CountryCode>,
    ) -> GuardOutcome {
        for stage in CheckoutStage::PLACE_ORDER {
            let outcome = self.check(stage, ctx, cart, location);
            if outcome.is_abort() {
                return outcome;
            }
        }
        GuardOutcome::Proceed
    }

    const fn outcome(stage: CheckoutStage, state: GuardState) -> GuardOutcome {
        match (state, stage.aborts()) {
            (GuardState::Blocked, true) => GuardOutcome::Abort,
            (GuardState::Blocked, false) => GuardOutcome::Restricted,
            (GuardState::Idle | GuardState::Clear, _) => GuardOutcome::Proceed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{CurrencyCode, NoticeKind, Price, ProductId};

    fn guard() -> CheckoutGuard {
        CheckoutGuard::from_config(Arc::new(RestrictionConfig {
            restricted_countries: vec![CountryCode::parse("US").unwrap()],
            restricted_product_ids: vec![ProductId::new(42)],
            restriction_message: "Not in your country.".to_string(),
        }))
    }

    fn cart() -> Cart {
        let mut cart = Cart::new(CurrencyCode::USD);
        let price = Price::new(Decimal::new(500, 2), CurrencyCode::USD);
        cart.add(ProductId::new(42), None, 1, "Widget", price);
        cart.add(ProductId::new(7), None, 1, "Gadget", price);
        cart
    }

    #[test]
    fn test_repeated_checks_emit_one_consolidated_notice() {
        let guard = guard();
        let cart = cart();
        let us = CountryCode::parse("US").unwrap();
        let mut ctx = RequestContext::new();

        for stage in [
            CheckoutStage::BeforeCheckout,
            CheckoutStage::CheckoutProcess,
            CheckoutStage::OrderReview,
            CheckoutStage::OrderProcessed,
            CheckoutStage::BeforeCheckout,
        ] {
            assert_eq!(guard.check(stage, &mut ctx, &cart, Some(&us)), GuardOutcome::Abort);
        }

        let summaries = ctx
            .notices()
            .iter()
            .filter(|n| matches!(n.body, NoticeBody::RestrictionSummary { .. }))
            .count();
        assert_eq!(summaries, 1);
        assert_eq!(ctx.notices().len(), 2);
        assert_eq!(ctx.notices()[1].body, NoticeBody::CheckoutBlocked);
        assert!(ctx.notices().iter().all(|n| n.kind == NoticeKind::Error));
    }

    #[test]
    fn test_summary_lists_restricted_names_only() {
        let guard = guard();
        let us = CountryCode::parse("US").unwrap();
        let mut ctx = RequestContext::new();

        guard.check(CheckoutStage::BeforeCheckout, &mut ctx, &cart(), Some(&us));

        match &ctx.notices()[0].body {
            NoticeBody::RestrictionSummary {
                message,
                product_names,
            } => {
                assert_eq!(message, "Not in your country.");
                assert_eq!(product_names, &vec!["Widget".to_string()]);
            }
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[test]
    fn test_cart_view_informs_without_aborting() {
        let guard = guard();
        let us = CountryCode::parse("US").unwrap();
        let mut ctx = RequestContext::new();

        let outcome = guard.check(CheckoutStage::CartView, &mut ctx, &cart(), Some(&us));
        assert_eq!(outcome, GuardOutcome::Restricted);
        assert!(!ctx.checkout_available());
        assert_eq!(ctx.notices().len(), 1);
        assert_eq!(ctx.notices()[0].kind, NoticeKind::Notice);
        match &ctx.notices()[0].body {
            NoticeBody::CartRestriction { lines, .. } => {
                assert_eq!(lines.len(), 1);
                assert_eq!(lines[0].product_id, ProductId::new(42));
            }
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[test]
    fn test_unrestricted_country_proceeds() {
        let guard = guard();
        let ca = CountryCode::parse("CA").unwrap();
        let mut ctx = RequestContext::new();

        assert_eq!(guard.place_order(&mut ctx, &cart(), Some(&ca)), GuardOutcome::Proceed);
        assert_eq!(ctx.state(), GuardState::Clear);
        assert!(ctx.notices().is_empty());
        assert!(ctx.checkout_available());
    }

    #[test]
    fn test_unknown_location_proceeds() {
        let mut ctx = RequestContext::new();
        assert_eq!(guard().place_order(&mut ctx, &cart(), None), GuardOutcome::Proceed);
        assert!(!ctx.notice_emitted());
    }

    #[test]
    fn test_new_request_resets_latch() {
        let guard = guard();
        let us = CountryCode::parse("US").unwrap();

        let mut first = RequestContext::new();
        guard.place_order(&mut first, &cart(), Some(&us));
        assert_eq!(first.into_notices().len(), 2);

        let mut second = RequestContext::new();
        assert_eq!(second.state(), GuardState::Idle);
        guard.place_order(&mut second, &cart(), Some(&us));
        assert_eq!(second.notices().len(), 2);
    }
}
