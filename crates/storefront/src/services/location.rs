//! Resolving the customer's country for a request.
//!
//! Gathers the sources [`LocationSources::resolve`] ranks: posted checkout
//! fields, the session profile, saved addresses of a logged-in customer,
//! and the session-cached country. Saved addresses need a database round
//! trip, so they are only read when the cheaper sources come up empty.

use tower_sessions::Session;
use tracing::debug;

use sell_restrict_core::{CountryCandidates, LocationSources, ResolvedLocation};

use crate::db::CustomerRepository;
use crate::error::Result;
use crate::models::{CurrentCustomer, CustomerProfile, session_keys};
use crate::state::AppState;

/// Resolve the current customer's country.
///
/// # Errors
///
/// Returns an error if the session or the customer's saved addresses cannot
/// be read.
pub async fn resolve(
    state: &AppState,
    session: &Session,
    customer: Option<&CurrentCustomer>,
    posted: CountryCandidates,
) -> Result<Option<ResolvedLocation>> {
    let profile = session
        .get::<CustomerProfile>(session_keys::CUSTOMER_PROFILE)
        .await?
        .unwrap_or_default();

    let mut sources = LocationSources {
        posted_form: posted,
        profile: profile.candidates(),
        ..LocationSources::default()
    };

    if sources.resolve().is_none() {
        if let Some(customer) = customer {
            sources.saved_address = CustomerRepository::new(state.pool())
                .saved_countries(customer.id)
                .await?;
        }
        sources.session = session.get::<String>(session_keys::CACHED_COUNTRY).await?;
    }

    let resolved = sources.resolve();
    if let Some(location) = &resolved {
        debug!(country = %location.country, source = %location.source, "Resolved customer country");
    } else {
        debug!("Customer country unknown");
    }
    Ok(resolved)
}

/// Remember countries entered at checkout in the session profile.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn remember_profile(session: &Session, posted: &CountryCandidates) -> Result<()> {
    let mut profile = session
        .get::<CustomerProfile>(session_keys::CUSTOMER_PROFILE)
        .await?
        .unwrap_or_default();
    let before = profile.clone();
    profile.update_from(posted);

    if profile != before {
        session
            .insert(session_keys::CUSTOMER_PROFILE, profile)
            .await?;
    }
    Ok(())
}
