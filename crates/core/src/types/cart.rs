//! Cart model.
//!
//! The cart belongs to the customer's session. Restriction logic only reads
//! it, except for the removal endpoint which removes whole lines and then
//! recalculates totals.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// Stable key identifying one line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(String);

impl LineKey {
    /// Derive the key for a product/variation pair.
    ///
    /// Adding the same product and variation twice lands on the same line.
    #[must_use]
    pub fn for_product(product_id: ProductId, variation_id: Option<ProductId>) -> Self {
        let variation = variation_id.map_or(0, |id| id.as_i64());
        Self(format!("{product_id}-{variation}"))
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// One entry in a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub line_key: LineKey,
    /// Parent product id (the product itself for simple products).
    pub product_id: ProductId,
    /// Variation id for variable products.
    pub variation_id: Option<ProductId>,
    pub quantity: u32,
    pub display_name: String,
    pub unit_price: Price,
}

impl CartLineItem {
    /// The variation id when present, otherwise the product id.
    #[must_use]
    pub fn effective_product_id(&self) -> ProductId {
        self.variation_id.unwrap_or(self.product_id)
    }

    /// Whether this line references `id` as its product or its variation.
    #[must_use]
    pub fn references(&self, id: ProductId) -> bool {
        self.product_id == id || self.variation_id == Some(id)
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Recalculated cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartTotals {
    pub subtotal: Price,
    pub item_count: u32,
}

/// A customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cart {
    lines: Vec<CartLineItem>,
    currency_code: CurrencyCode,
    totals: CartTotals,
}

impl Cart {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency_code: CurrencyCode) -> Self {
        Self {
            lines: Vec::new(),
            currency_code,
            totals: CartTotals {
                subtotal: Price::zero(currency_code),
                item_count: 0,
            },
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Currency every line is priced in.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Totals as of the last recalculation.
    #[must_use]
    pub const fn totals(&self) -> CartTotals {
        self.totals
    }

    /// Add a product to the cart, merging with an existing line for the same
    /// product/variation pair. Returns the line key.
    pub fn add(
        &mut self,
        product_id: ProductId,
        variation_id: Option<ProductId>,
        quantity: u32,
        display_name: impl Into<String>,
        unit_price: Price,
    ) -> LineKey {
        let line_key = LineKey::for_product(product_id, variation_id);
        let quantity = quantity.max(1);

        if let Some(line) = self.lines.iter_mut().find(|l| l.line_key == line_key) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLineItem {
                line_key: line_key.clone(),
                product_id,
                variation_id,
                quantity,
                display_name: display_name.into(),
                unit_price,
            });
        }

        self.calculate_totals();
        line_key
    }

    /// Remove a single line. Totals are not recalculated; callers batch
    /// removals and call [`Cart::calculate_totals`] once.
    pub fn remove_line(&mut self, line_key: &LineKey) -> Option<CartLineItem> {
        let index = self.lines.iter().position(|l| &l.line_key == line_key)?;
        Some(self.lines.remove(index))
    }

    /// Recompute subtotal and item count from the current lines.
    pub fn calculate_totals(&mut self) {
        let subtotal = self
            .lines
            .iter()
            .fold(Price::zero(self.currency_code), |acc, line| {
                acc + line.line_total()
            });
        let item_count = self
            .lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity));

        self.totals = CartTotals {
            subtotal,
            item_count,
        };
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn usd(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2), CurrencyCode::USD)
    }

    #[test]
    fn test_add_merges_same_product_and_variation() {
        let mut cart = Cart::new(CurrencyCode::USD);
        let first = cart.add(ProductId::new(10), None, 1, "Mug", usd(500));
        let second = cart.add(ProductId::new(10), None, 2, "Mug", usd(500));

        assert_eq!(first, second);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.totals().item_count, 3);
        assert_eq!(cart.totals().subtotal, usd(1500));
    }

    #[test]
    fn test_variations_get_separate_lines() {
        let mut cart = Cart::new(CurrencyCode::USD);
        cart.add(ProductId::new(10), Some(ProductId::new(11)), 1, "Shirt - S", usd(1000));
        cart.add(ProductId::new(10), Some(ProductId::new(12)), 1, "Shirt - M", usd(1000));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(
            cart.lines().first().map(CartLineItem::effective_product_id),
            Some(ProductId::new(11))
        );
    }

    #[test]
    fn test_remove_line_then_recalculate() {
        let mut cart = Cart::new(CurrencyCode::USD);
        let keep = cart.add(ProductId::new(1), None, 1, "A", usd(100));
        let drop = cart.add(ProductId::new(2), None, 4, "B", usd(250));

        let removed = cart.remove_line(&drop).expect("line exists");
        assert_eq!(removed.display_name, "B");
        cart.calculate_totals();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().map(|l| l.line_key.clone()), Some(keep));
        assert_eq!(cart.totals().subtotal, usd(100));
        assert_eq!(cart.totals().item_count, 1);
    }

    #[test]
    fn test_remove_missing_line_is_none() {
        let mut cart = Cart::new(CurrencyCode::USD);
        assert!(cart.remove_line(&LineKey::from("nope".to_string())).is_none());
    }

    #[test]
    fn test_references_checks_product_and_variation() {
        let mut cart = Cart::new(CurrencyCode::USD);
        cart.add(ProductId::new(10), Some(ProductId::new(11)), 1, "Shirt - S", usd(1000));
        let line = cart.lines().first().expect("one line");

        assert!(line.references(ProductId::new(10)));
        assert!(line.references(ProductId::new(11)));
        assert!(!line.references(ProductId::new(12)));
    }
}
