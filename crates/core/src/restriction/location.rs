//! Customer location resolution.
//!
//! The customer's country is never stored; it is derived on every request
//! from whatever the request knows about the customer. Sources are
//! consulted in a fixed priority order and the first non-blank value wins.
//! A non-blank value that is not a usable code still wins; it resolves to
//! an unknown country rather than falling through to a weaker source.

use core::fmt;

use tracing::debug;

use crate::types::{CountryCode, CountryCodeError};

/// Where a resolved country came from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationSource {
    /// Fields posted with the checkout form in this request.
    PostedForm,
    /// The customer profile held in the session.
    Profile,
    /// Addresses saved against the logged-in customer.
    SavedAddress,
    /// A country cached in the session by the country selector.
    Session,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PostedForm => "posted_form",
            Self::Profile => "profile",
            Self::SavedAddress => "saved_address",
            Self::Session => "session",
        })
    }
}

/// Raw billing/shipping country values from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCandidates {
    pub billing: Option<String>,
    pub shipping: Option<String>,
}

impl CountryCandidates {
    #[must_use]
    pub fn new(billing: Option<impl Into<String>>, shipping: Option<impl Into<String>>) -> Self {
        Self {
            billing: billing.map(Into::into),
            shipping: shipping.map(Into::into),
        }
    }

    /// Billing first, then shipping. `None` when both are blank.
    fn first(&self) -> Option<Candidate> {
        candidate(self.billing.as_deref()).or_else(|| candidate(self.shipping.as_deref()))
    }
}

type Candidate = Result<CountryCode, CountryCodeError>;

/// A non-blank raw value, parsed.
fn candidate(value: Option<&str>) -> Option<Candidate> {
    value
        .map(CountryCode::parse)
        .filter(|parsed| !matches!(parsed, Err(CountryCodeError::Empty)))
}

/// Everything the current request knows about the customer's country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSources {
    pub posted_form: CountryCandidates,
    pub profile: CountryCandidates,
    pub saved_address: CountryCandidates,
    pub session: Option<String>,
}

/// A country together with the source it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub country: CountryCode,
    pub source: LocationSource,
}

impl LocationSources {
    /// Resolve the customer's country. `None` means unknown, which callers
    /// must treat as unrestricted.
    #[must_use]
    pub fn resolve(&self) -> Option<ResolvedLocation> {
        let levels = [
            (LocationSource::PostedForm, self.posted_form.first()),
            (LocationSource::Profile, self.profile.first()),
            (LocationSource::SavedAddress, self.saved_address.first()),
            (LocationSource::Session, candidate(self.session.as_deref())),
        ];
        let (source, parsed) = levels
            .into_iter()
            .find_map(|(source, found)| found.map(|parsed| (source, parsed)))?;

        match parsed {
            Ok(country) => Some(ResolvedLocation { country, source }),
            Err(error) => {
                debug!(%source, %error, "Unusable customer country");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn all_levels() -> LocationSources {
        LocationSources {
            posted_form: CountryCandidates::new(Some("FR"), Some("DE")),
            profile: CountryCandidates::new(Some("CA"), None::<String>),
            saved_address: CountryCandidates::new(None::<String>, Some("MX")),
            session: Some("US".to_string()),
        }
    }

    #[test]
    fn test_posted_form_wins() {
        let resolved = all_levels().resolve().unwrap();
        assert_eq!(resolved.country.as_str(), "FR");
        assert_eq!(resolved.source, LocationSource::PostedForm);
    }

    #[test]
    fn test_profile_overrides_saved_and_session() {
        let sources = LocationSources {
            posted_form: CountryCandidates::default(),
            ..all_levels()
        };
        let resolved = sources.resolve().unwrap();
        assert_eq!(resolved.country.as_str(), "CA");
        assert_eq!(resolved.source, LocationSource::Profile);
    }

    #[test]
    fn test_saved_address_overrides_session() {
        let sources = LocationSources {
            posted_form: CountryCandidates::default(),
            profile: CountryCandidates::default(),
            ..all_levels()
        };
        let resolved = sources.resolve().unwrap();
        assert_eq!(resolved.country.as_str(), "MX");
        assert_eq!(resolved.source, LocationSource::SavedAddress);
    }

    #[test]
    fn test_session_is_last_resort() {
        let sources = LocationSources {
            session: Some("US".to_string()),
            ..LocationSources::default()
        };
        let resolved = sources.resolve().unwrap();
        assert_eq!(resolved.country.as_str(), "US");
        assert_eq!(resolved.source, LocationSource::Session);
    }

    #[test]
    fn test_blank_values_fall_through() {
        let sources = LocationSources {
            posted_form: CountryCandidates::new(Some("  "), Some("")),
            profile: CountryCandidates::new(Some(""), Some("GB")),
            ..LocationSources::default()
        };
        let resolved = sources.resolve().unwrap();
        assert_eq!(resolved.country.as_str(), "GB");
        assert_eq!(resolved.source, LocationSource::Profile);
    }

    #[test]
    fn test_nothing_known_is_none() {
        assert!(LocationSources::default().resolve().is_none());
    }

    fn too_long() -> Option<String> {
        Some("X".repeat(CountryCode::MAX_LENGTH + 4))
    }

    #[test]
    fn test_unusable_posted_value_does_not_fall_through() {
        let sources = LocationSources {
            posted_form: CountryCandidates::new(too_long(), Some("DE")),
            ..all_levels()
        };
        assert!(sources.resolve().is_none());
    }

    #[test]
    fn test_unusable_profile_value_does_not_fall_through() {
        let sources = LocationSources {
            posted_form: CountryCandidates::default(),
            profile: CountryCandidates::new(None::<String>, too_long()),
            ..all_levels()
        };
        assert!(sources.resolve().is_none());
    }

    #[test]
    fn test_unusable_saved_address_does_not_fall_through() {
        let sources = LocationSources {
            posted_form: CountryCandidates::default(),
            profile: CountryCandidates::default(),
            saved_address: CountryCandidates::new(too_long(), None::<String>),
            ..all_levels()
        };
        assert!(sources.resolve().is_none());
    }

    #[test]
    fn test_unusable_session_value_is_unknown() {
        let sources = LocationSources {
            session: too_long(),
            ..LocationSources::default()
        };
        assert!(sources.resolve().is_none());
    }
}
