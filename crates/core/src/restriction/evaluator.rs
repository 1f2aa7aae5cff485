//! Restriction evaluation.
//!
//! A line is restricted when its product or variation id is listed AND the
//! customer's resolved country is listed. Anything that cannot be decided
//! (no country, nothing configured) is treated as unrestricted.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::config::RestrictionConfig;
use crate::types::{Cart, CountryCode, LineKey, ProductId, RestrictedLine};

/// A cart line that may not be purchased from the customer's country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictedItem {
    pub line_key: LineKey,
    /// Variation id when present, otherwise the product id.
    pub effective_product_id: ProductId,
    pub parent_product_id: ProductId,
    pub display_name: String,
    pub quantity: u32,
}

impl RestrictedItem {
    /// The form used inside notices.
    #[must_use]
    pub fn to_notice_line(&self) -> RestrictedLine {
        RestrictedLine {
            product_id: self.effective_product_id,
            display_name: self.display_name.clone(),
        }
    }
}

/// Static notice shown on a single product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductNotice {
    /// Sanitized rich-text message.
    pub message: String,
    /// Display names of every configured country, in configured order.
    pub countries: Vec<String>,
}

impl ProductNotice {
    /// Countries joined for display.
    #[must_use]
    pub fn countries_label(&self) -> String {
        self.countries.join(", ")
    }
}

/// Evaluates a [`RestrictionConfig`] against carts and products.
#[derive(Debug, Clone)]
pub struct RestrictionEvaluator {
    config: Arc<RestrictionConfig>,
}

impl RestrictionEvaluator {
    #[must_use]
    pub const fn new(config: Arc<RestrictionConfig>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RestrictionConfig {
        &self.config
    }

    /// Lines of `cart` that are restricted for `location`, in cart order.
    ///
    /// Checks run cheapest first and return early: unresolved location,
    /// no countries configured, location not listed, no products listed.
    #[must_use]
    pub fn find_restricted_items(
        &self,
        cart: &Cart,
        location: Option<&CountryCode>,
    ) -> Vec<RestrictedItem> {
        let Some(country) = location else {
            debug!("No customer country resolved; nothing restricted");
            return Vec::new();
        };
        if self.config.restricted_countries.is_empty() {
            return Vec::new();
        }
        if !self.config.is_country_restricted(country) {
            debug!(country = %country, "Country not restricted");
            return Vec::new();
        }
        if self.config.restricted_product_ids.is_empty() {
            return Vec::new();
        }

        let items: Vec<RestrictedItem> = cart
            .lines()
            .iter()
            .filter(|line| {
                self.config.is_product_listed(line.effective_product_id())
                    || self.config.is_product_listed(line.product_id)
            })
            .map(|line| RestrictedItem {
                line_key: line.line_key.clone(),
                effective_product_id: line.effective_product_id(),
                parent_product_id: line.product_id,
                display_name: line.display_name.clone(),
                quantity: line.quantity,
            })
            .collect();

        debug!(
            country = %country,
            countries = self.config.restricted_countries.len(),
            products = self.config.restricted_product_ids.len(),
            matched = items.len(),
            "Evaluated cart restrictions"
        );

        items
    }

    /// Whether a product, or any of its variations, is listed.
    ///
    /// Independent of the visitor's country.
    #[must_use]
    pub fn is_product_restricted(&self, product_id: ProductId, variation_ids: &[ProductId]) -> bool {
        self.config.is_product_listed(product_id)
            || variation_ids
                .iter()
                .any(|id| self.config.is_product_listed(*id))
    }

    /// Notice for a single product page, if one should be shown.
    ///
    /// Shown only when the product (or a sibling variation) is listed and
    /// at least one country is configured.
    #[must_use]
    pub fn product_notice(
        &self,
        product_id: ProductId,
        variation_ids: &[ProductId],
    ) -> Option<ProductNotice> {
        if self.config.restricted_countries.is_empty()
            || !self.is_product_restricted(product_id, variation_ids)
        {
            return None;
        }

        Some(ProductNotice {
            message: self.config.restriction_message.clone(),
            countries: self
                .config
                .restricted_countries
                .iter()
                .map(|c| c.display_name().to_string())
                .collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{CurrencyCode, Price};

    fn country(code: &str) -> CountryCode {
        CountryCode::parse(code).unwrap()
    }

    fn evaluator(countries: &[&str], products: &[i64]) -> RestrictionEvaluator {
        RestrictionEvaluator::new(Arc::new(RestrictionConfig {
            restricted_countries: countries.iter().map(|c| country(c)).collect(),
            restricted_product_ids: products.iter().copied().map(ProductId::new).collect(),
            ..RestrictionConfig::default()
        }))
    }

    fn price() -> Price {
        Price::new(Decimal::new(1000, 2), CurrencyCode::USD)
    }

    fn cart_with(lines: &[(i64, Option<i64>, &str)]) -> Cart {
        let mut cart = Cart::new(CurrencyCode::USD);
        for (product, variation, name) in lines {
            cart.add(
                ProductId::new(*product),
                variation.map(ProductId::new),
                1,
                *name,
                price(),
            );
        }
        cart
    }

    #[test]
    fn test_listed_product_in_listed_country() {
        let eval = evaluator(&["US"], &[42]);
        let cart = cart_with(&[(42, None, "Widget")]);

        let items = eval.find_restricted_items(&cart, Some(&country("US")));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].effective_product_id, ProductId::new(42));
        assert_eq!(items[0].parent_product_id, ProductId::new(42));
        assert_eq!(items[0].display_name, "Widget");
        assert_eq!(items[0].quantity, 1);

        assert!(eval.find_restricted_items(&cart, Some(&country("CA"))).is_empty());
    }

    #[test]
    fn test_unresolved_location_is_unrestricted() {
        let eval = evaluator(&["US"], &[42]);
        let cart = cart_with(&[(42, None, "Widget")]);
        assert!(eval.find_restricted_items(&cart, None).is_empty());
    }

    #[test]
    fn test_empty_config_never_restricts() {
        let cart = cart_with(&[(42, None, "Widget"), (7, Some(8), "Shirt")]);
        let us = country("US");

        assert!(evaluator(&[], &[42, 8]).find_restricted_items(&cart, Some(&us)).is_empty());
        assert!(evaluator(&["US"], &[]).find_restricted_items(&cart, Some(&us)).is_empty());
        assert!(evaluator(&[], &[]).find_restricted_items(&cart, Some(&us)).is_empty());
    }

    #[test]
    fn test_matches_variation_or_parent_in_cart_order() {
        let eval = evaluator(&["US"], &[8, 20]);
        let cart = cart_with(&[
            (20, Some(21), "Parent listed"),
            (1, None, "Unlisted"),
            (7, Some(8), "Variation listed"),
            (7, Some(9), "Sibling variation"),
        ]);

        let items = eval.find_restricted_items(&cart, Some(&country("US")));
        let names: Vec<&str> = items.iter().map(|i| i.display_name.as_str()).collect();
        assert_eq!(names, vec!["Parent listed", "Variation listed"]);
        assert_eq!(items[0].effective_product_id, ProductId::new(21));
        assert_eq!(items[0].parent_product_id, ProductId::new(20));
    }

    #[test]
    fn test_is_product_restricted_checks_variations() {
        let eval = evaluator(&[], &[8]);
        assert!(eval.is_product_restricted(ProductId::new(7), &[ProductId::new(8)]));
        assert!(eval.is_product_restricted(ProductId::new(8), &[]));
        assert!(!eval.is_product_restricted(ProductId::new(7), &[ProductId::new(9)]));
    }

    #[test]
    fn test_product_notice_requires_countries() {
        assert!(evaluator(&[], &[42]).product_notice(ProductId::new(42), &[]).is_none());
        assert!(evaluator(&["US"], &[42]).product_notice(ProductId::new(1), &[]).is_none());

        let notice = evaluator(&["US", "ZZ", "CA"], &[42])
            .product_notice(ProductId::new(42), &[])
            .unwrap();
        assert_eq!(notice.countries_label(), "United States (US), ZZ, Canada");
    }
}
