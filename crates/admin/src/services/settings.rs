//! The restriction Settings Store.
//!
//! Reads never fail on a missing or partial record: stored fields are merged
//! over the defaults. Saves sanitize each submitted field on its own and
//! merge the result into the stored record in one statement.

use sqlx::PgPool;
use tracing::{info, warn};

use sell_restrict_core::{RestrictionConfig, SettingsUpdate, StoredSettings};

use crate::db::{RepositoryError, SettingsRepository};

/// Settings Store over the shared database.
pub struct SettingsStore<'a> {
    repo: SettingsRepository<'a>,
}

impl<'a> SettingsStore<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: SettingsRepository::new(pool),
        }
    }

    /// The stored configuration merged over defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings cannot be read.
    pub async fn get(&self) -> Result<RestrictionConfig, RepositoryError> {
        let stored = self
            .repo
            .get_restriction_settings()
            .await?
            .map_or_else(StoredSettings::default, decode);
        Ok(RestrictionConfig::from_stored(stored))
    }

    /// Sanitize and persist an update. Fields absent from `update` keep
    /// their stored values. Returns the configuration now in effect.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings cannot be written.
    pub async fn save(&self, update: &SettingsUpdate) -> Result<RestrictionConfig, RepositoryError> {
        let sanitized = update.sanitize();
        let saved = self.repo.save_restriction_settings(&sanitized).await?;
        let config = RestrictionConfig::from_stored(decode(saved));

        info!(
            countries = config.restricted_countries.len(),
            products = config.restricted_product_ids.len(),
            "Saved restriction settings"
        );
        Ok(config)
    }
}

fn decode(value: serde_json::Value) -> StoredSettings {
    let (stored, valid) = StoredSettings::from_json_lossy(value);
    if !valid {
        warn!("Stored restriction settings are malformed; using defaults");
    }
    stored
}
