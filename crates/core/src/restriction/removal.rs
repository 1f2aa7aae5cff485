//! Removing restricted lines from a cart.
//!
//! Input is validated in full before the cart is touched: a request either
//! removes every matching line or nothing at all.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Cart, LineKey, ProductId};

/// Why a removal request was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RemovalError {
    /// Missing, not a list, empty, or containing a non-integer entry.
    #[error("Invalid product IDs.")]
    InvalidProductIds,
}

/// Parse the `product_ids` field of a removal request.
///
/// Accepts a non-empty array whose entries are integers or integer strings;
/// signs are dropped. Zero is accepted but can never match a line.
///
/// # Errors
///
/// Returns [`RemovalError::InvalidProductIds`] if the value is absent, not
/// an array, empty, or has any entry that is not an integer.
pub fn parse_product_ids(value: Option<&Value>) -> Result<Vec<ProductId>, RemovalError> {
    let Some(Value::Array(entries)) = value else {
        return Err(RemovalError::InvalidProductIds);
    };
    if entries.is_empty() {
        return Err(RemovalError::InvalidProductIds);
    }

    entries
        .iter()
        .map(|entry| match entry {
            Value::Number(n) => n
                .as_i64()
                .and_then(i64::checked_abs)
                .map(ProductId::new),
            Value::String(s) => ProductId::parse_absolute(s),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(RemovalError::InvalidProductIds)
}

/// Summary when no cart line matched.
pub const NOTHING_REMOVED_MESSAGE: &str = "No restricted items were found in your cart.";

/// What a removal did.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalSummary {
    pub message: String,
    /// Display names of removed lines, in cart order.
    pub removed_items: Vec<String>,
}

/// Remove every line whose product or variation id is in `ids`, then
/// recalculate totals once. Lines that match nothing are left alone.
pub fn remove_product_lines(cart: &mut Cart, ids: &[ProductId]) -> RemovalSummary {
    let matching: Vec<LineKey> = cart
        .lines()
        .iter()
        .filter(|line| ids.iter().any(|id| id.is_valid() && line.references(*id)))
        .map(|line| line.line_key.clone())
        .collect();

    let removed_items: Vec<String> = matching
        .iter()
        .filter_map(|key| cart.remove_line(key))
        .map(|line| line.display_name)
        .collect();

    cart.calculate_totals();

    let message = if removed_items.is_empty() {
        NOTHING_REMOVED_MESSAGE.to_string()
    } else {
        format!("Removed restricted items: {}", removed_items.join(", "))
    };
    RemovalSummary {
        message,
        removed_items,
    }
}
