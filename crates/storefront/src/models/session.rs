//! Session-related types.
//!
//! Everything a customer accumulates while browsing lives in their session:
//! identity, the profile entered at checkout, the cart, a cached country,
//! queued notices, and the anti-forgery token.

use serde::{Deserialize, Serialize};

use sell_restrict_core::{CountryCandidates, CustomerId};

/// Session-stored customer identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    pub id: CustomerId,
    pub email: String,
}

/// Billing and shipping countries entered during checkout.
///
/// Updated whenever the checkout form is reviewed or submitted, so later
/// requests without posted fields still know where the customer is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub billing_country: Option<String>,
    pub shipping_country: Option<String>,
}

impl CustomerProfile {
    /// Overwrite fields that carry a non-blank value.
    pub fn update_from(&mut self, candidates: &CountryCandidates) {
        if let Some(billing) = non_blank(candidates.billing.as_deref()) {
            self.billing_country = Some(billing);
        }
        if let Some(shipping) = non_blank(candidates.shipping.as_deref()) {
            self.shipping_country = Some(shipping);
        }
    }

    #[must_use]
    pub fn candidates(&self) -> CountryCandidates {
        CountryCandidates {
            billing: self.billing_country.clone(),
            shipping: self.shipping_country.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for the checkout profile (billing/shipping countries).
    pub const CUSTOMER_PROFILE: &str = "customer_profile";

    /// Key for the country chosen with the country selector.
    pub const CACHED_COUNTRY: &str = "customer_country";

    /// Key for the cart.
    pub const CART: &str = "cart";

    /// Key for notices queued for the next page render.
    pub const NOTICES: &str = "notices";

    /// Key for the anti-forgery token.
    pub const CSRF_TOKEN: &str = "csrf_token";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_ignores_blank_fields() {
        let mut profile = CustomerProfile {
            billing_country: Some("US".to_string()),
            shipping_country: None,
        };

        profile.update_from(&CountryCandidates {
            billing: Some("  ".to_string()),
            shipping: Some("CA".to_string()),
        });

        assert_eq!(profile.billing_country.as_deref(), Some("US"));
        assert_eq!(profile.shipping_country.as_deref(), Some("CA"));
    }
}
