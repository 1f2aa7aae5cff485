//! Display data shared by storefront templates.
//!
//! Templates only see flattened, already-formatted values. Restriction
//! messages arrive here sanitized by the settings save path and are the
//! only values rendered without escaping.

use sell_restrict_core::{
    COUNTRIES, Cart, CartLineItem, Notice, NoticeBody, NoticeKind, RESTRICTION_NOTICE_TITLE,
};

/// A notice ready to render.
#[derive(Debug, Clone)]
pub struct NoticeView {
    /// CSS modifier: `success`, `notice` or `error`.
    pub kind: &'static str,
    pub title: Option<&'static str>,
    /// Sanitized rich text.
    pub message_html: Option<String>,
    pub text: Option<String>,
    pub items_label: Option<&'static str>,
    pub items: Vec<String>,
    /// Whether the client should attach remove controls.
    pub removable: bool,
    /// JSON array of product ids, for `data-product-ids`.
    pub product_ids_json: String,
    /// JSON array of product names, for `data-product-names`.
    pub product_names_json: String,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        let kind = match notice.kind {
            NoticeKind::Success => "success",
            NoticeKind::Notice => "notice",
            NoticeKind::Error => "error",
        };

        let mut view = Self {
            kind,
            title: None,
            message_html: None,
            text: notice.body.plain_text().map(String::from),
            items_label: None,
            items: Vec::new(),
            removable: false,
            product_ids_json: "[]".to_string(),
            product_names_json: "[]".to_string(),
        };

        match &notice.body {
            NoticeBody::RestrictionSummary {
                message,
                product_names,
            } => {
                view.title = Some(RESTRICTION_NOTICE_TITLE);
                view.message_html = Some(message.clone());
                view.items_label = Some("Restricted Products:");
                view.items.clone_from(product_names);
            }
            NoticeBody::CartRestriction { message, lines } => {
                let ids: Vec<i64> = lines.iter().map(|l| l.product_id.as_i64()).collect();
                let names: Vec<&str> = lines.iter().map(|l| l.display_name.as_str()).collect();

                view.title = Some(RESTRICTION_NOTICE_TITLE);
                view.message_html = Some(message.clone());
                view.items_label = Some("Restricted Products:");
                view.items = names.iter().map(|n| (*n).to_string()).collect();
                view.removable = true;
                view.product_ids_json = to_json_array(&ids);
                view.product_names_json = to_json_array(&names);
            }
            NoticeBody::CheckoutBlocked | NoticeBody::Text { .. } => {}
        }

        view
    }
}

fn to_json_array<T: serde::Serialize>(values: &[T]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Convert notices in display order.
#[must_use]
pub fn notice_views(notices: &[Notice]) -> Vec<NoticeView> {
    notices.iter().map(NoticeView::from).collect()
}

/// One cart line for display.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub line_key: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            line_key: line.line_key.as_str().to_string(),
            name: line.display_name.clone(),
            quantity: line.quantity,
            price: line.unit_price.to_string(),
            line_price: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: totals.subtotal.to_string(),
            item_count: totals.item_count,
        }
    }
}

/// A `<option>` in a country select.
#[derive(Debug, Clone)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// Every known country, marking `selected` as chosen.
#[must_use]
pub fn country_options(selected: Option<&str>) -> Vec<CountryOption> {
    COUNTRIES
        .iter()
        .map(|&(code, name)| CountryOption {
            code,
            name,
            selected: selected == Some(code),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use sell_restrict_core::{ProductId, RestrictedLine};

    use super::*;

    #[test]
    fn test_cart_restriction_view_carries_ids_and_names() {
        let notice = Notice::notice(NoticeBody::CartRestriction {
            message: "<p>No</p>".to_string(),
            lines: vec![
                RestrictedLine {
                    product_id: ProductId::new(42),
                    display_name: "Widget".to_string(),
                },
                RestrictedLine {
                    product_id: ProductId::new(51),
                    display_name: "Shirt \"S\"".to_string(),
                },
            ],
        });

        let view = NoticeView::from(&notice);
        assert_eq!(view.kind, "notice");
        assert!(view.removable);
        assert_eq!(view.product_ids_json, "[42,51]");
        assert_eq!(view.product_names_json, r#"["Widget","Shirt \"S\""]"#);
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn test_checkout_blocked_view_is_plain_text() {
        let view = NoticeView::from(&Notice::error(NoticeBody::CheckoutBlocked));
        assert_eq!(view.kind, "error");
        assert!(!view.removable);
        assert_eq!(
            view.text.as_deref(),
            Some("Checkout cannot be completed due to restricted products in your cart.")
        );
    }

    #[test]
    fn test_country_options_marks_selection() {
        let options = country_options(Some("CA"));
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].code, "CA");
    }
}
