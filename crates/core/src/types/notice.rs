//! User-facing notices queued for the next page render.
//!
//! Notices carry structured content; the storefront turns them into HTML.
//! Keeping them structured lets the session store them between requests
//! and keeps escaping decisions in one place (the templates).

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Text of the generic error that accompanies a consolidated restriction notice.
pub const CHECKOUT_BLOCKED_MESSAGE: &str =
    "Checkout cannot be completed due to restricted products in your cart.";

/// Heading shown above restriction notices.
pub const RESTRICTION_NOTICE_TITLE: &str = "Purchase Restriction Notice";

/// Severity of a notice, matching the storefront's notice styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Notice,
    Error,
}

/// A restricted cart line as shown in a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedLine {
    pub product_id: ProductId,
    pub display_name: String,
}

/// What a notice says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoticeBody {
    /// Consolidated checkout error: the configured message plus every
    /// restricted product name.
    RestrictionSummary {
        /// Sanitized rich-text message.
        message: String,
        product_names: Vec<String>,
    },
    /// Generic "checkout blocked" error that accompanies the summary.
    CheckoutBlocked,
    /// Inline cart/checkout notice the client attaches a remove control to.
    CartRestriction {
        /// Sanitized rich-text message.
        message: String,
        lines: Vec<RestrictedLine>,
    },
    /// Plain text.
    Text { text: String },
}

impl NoticeBody {
    /// Plain text for bodies that carry no markup.
    #[must_use]
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            Self::CheckoutBlocked => Some(CHECKOUT_BLOCKED_MESSAGE),
            Self::Text { text } => Some(text),
            Self::RestrictionSummary { .. } | Self::CartRestriction { .. } => None,
        }
    }
}

/// A notice queued for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub body: NoticeBody,
}

impl Notice {
    /// Create an error notice.
    #[must_use]
    pub const fn error(body: NoticeBody) -> Self {
        Self {
            kind: NoticeKind::Error,
            body,
        }
    }

    /// Create an informational notice.
    #[must_use]
    pub const fn notice(body: NoticeBody) -> Self {
        Self {
            kind: NoticeKind::Notice,
            body,
        }
    }

    /// Create a success notice with plain text.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            body: NoticeBody::Text { text: text.into() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_round_trips_through_session_json() {
        let notice = Notice::notice(NoticeBody::CartRestriction {
            message: "<p>Not here</p>".to_string(),
            lines: vec![RestrictedLine {
                product_id: ProductId::new(42),
                display_name: "Widget".to_string(),
            }],
        });

        let json = serde_json::to_value(&notice).expect("serialize");
        assert_eq!(json["kind"], "notice");
        assert_eq!(json["body"]["type"], "cart_restriction");

        let back: Notice = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, notice);
    }
}
