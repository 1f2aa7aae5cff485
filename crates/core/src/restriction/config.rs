//! Restriction settings: defaults, stored shape, and sanitization.
//!
//! The persisted record may be missing, partial, or carry keys from older
//! versions. [`RestrictionConfig::from_stored`] merges whatever is present
//! over the defaults field by field, so reading settings never fails.

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize_rich_text;
use crate::types::{CountryCode, ProductId};

/// Message shown when nothing has been configured yet.
pub const DEFAULT_RESTRICTION_MESSAGE: &str =
    "These products are not available for purchase in your country.";

/// The restriction configuration consumed by the evaluator and guard.
///
/// Countries and products behave as sets (no duplicates) but keep the
/// admin's selection order for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionConfig {
    pub restricted_countries: Vec<CountryCode>,
    pub restricted_product_ids: Vec<ProductId>,
    /// Sanitized rich text.
    pub restriction_message: String,
}

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            restricted_countries: Vec::new(),
            restricted_product_ids: Vec::new(),
            restriction_message: DEFAULT_RESTRICTION_MESSAGE.to_string(),
        }
    }
}

impl RestrictionConfig {
    /// Merge a stored record over the defaults.
    ///
    /// The message is sanitized again here since rows may have been written
    /// without going through [`SettingsUpdate::sanitize`].
    #[must_use]
    pub fn from_stored(stored: StoredSettings) -> Self {
        let defaults = Self::default();

        Self {
            restricted_countries: stored
                .restricted_countries
                .map_or(defaults.restricted_countries, |codes| {
                    dedup(codes.iter().filter_map(|c| CountryCode::parse(c).ok()))
                }),
            restricted_product_ids: stored
                .restricted_products
                .map_or(defaults.restricted_product_ids, |ids| {
                    dedup(ids.into_iter().map(ProductId::new).filter(ProductId::is_valid))
                }),
            restriction_message: sanitize_rich_text(
                &stored
                    .restriction_message
                    .unwrap_or(defaults.restriction_message),
            ),
        }
    }

    /// Whether a country is configured as restricted.
    #[must_use]
    pub fn is_country_restricted(&self, country: &CountryCode) -> bool {
        self.restricted_countries.contains(country)
    }

    /// Whether a product or variation id is configured as restricted.
    #[must_use]
    pub fn is_product_listed(&self, id: ProductId) -> bool {
        self.restricted_product_ids.contains(&id)
    }

    /// Convert back into the persisted shape.
    #[must_use]
    pub fn to_stored(&self) -> StoredSettings {
        StoredSettings {
            restricted_countries: Some(
                self.restricted_countries
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            ),
            restricted_products: Some(
                self.restricted_product_ids
                    .iter()
                    .map(ProductId::as_i64)
                    .collect(),
            ),
            restriction_message: Some(self.restriction_message.clone()),
        }
    }
}

/// The persisted settings record. Every field is optional so that partial
/// records written by older versions still load; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_products: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction_message: Option<String>,
}

impl StoredSettings {
    /// Decode a stored JSON value. Anything that is not an object with the
    /// expected field types decodes as an empty record.
    #[must_use]
    pub fn from_json_lossy(value: serde_json::Value) -> (Self, bool) {
        serde_json::from_value::<Self>(value).map_or_else(|_| (Self::default(), false), |s| (s, true))
    }
}

/// Raw settings submitted by the admin. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub restricted_countries: Option<Vec<String>>,
    #[serde(default)]
    pub restricted_products: Option<Vec<String>>,
    #[serde(default)]
    pub restriction_message: Option<String>,
}

impl SettingsUpdate {
    /// Sanitize each present field independently.
    ///
    /// - countries: text-sanitized, blanks dropped, duplicates removed
    /// - products: absolute integers, zero and non-numeric entries dropped
    /// - message: reduced to safe rich text
    #[must_use]
    pub fn sanitize(&self) -> StoredSettings {
        StoredSettings {
            restricted_countries: self.restricted_countries.as_ref().map(|codes| {
                dedup(codes.iter().filter_map(|c| CountryCode::parse(c).ok()))
                    .into_iter()
                    .map(|c| c.as_str().to_string())
                    .collect()
            }),
            restricted_products: self.restricted_products.as_ref().map(|ids| {
                dedup(
                    ids.iter()
                        .filter_map(|id| ProductId::parse_absolute(id))
                        .filter(ProductId::is_valid),
                )
                .into_iter()
                .map(|id| id.as_i64())
                .collect()
            }),
            restriction_message: self
                .restriction_message
                .as_deref()
                .map(sanitize_rich_text),
        }
    }
}

fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
