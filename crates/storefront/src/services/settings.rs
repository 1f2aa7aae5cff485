//! Cached access to the restriction configuration.
//!
//! Settings are written by the admin binary and read on almost every cart
//! and checkout request, so the merged configuration is cached for a short
//! time (`moka`, 30-second TTL). A save in the admin becomes visible here
//! within one TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, warn};

use sell_restrict_core::{CheckoutGuard, RestrictionConfig, StoredSettings};

use crate::db::{RepositoryError, SettingsRepository};

const CACHE_TTL: Duration = Duration::from_secs(30);

/// Provides the current [`RestrictionConfig`].
#[derive(Clone)]
pub struct SettingsProvider {
    pool: PgPool,
    cache: Cache<(), Arc<RestrictionConfig>>,
}

impl SettingsProvider {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// The stored configuration merged over defaults.
    ///
    /// A missing record yields the defaults; an undecodable record logs a
    /// warning and also yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings cannot be read.
    pub async fn current(&self) -> Result<Arc<RestrictionConfig>, RepositoryError> {
        if let Some(config) = self.cache.get(&()).await {
            return Ok(config);
        }

        let stored = match SettingsRepository::new(&self.pool)
            .get_restriction_settings()
            .await?
        {
            Some(value) => {
                let (stored, valid) = StoredSettings::from_json_lossy(value);
                if !valid {
                    warn!("Stored restriction settings are malformed; using defaults");
                }
                stored
            }
            None => StoredSettings::default(),
        };

        let config = Arc::new(RestrictionConfig::from_stored(stored));
        debug!(
            countries = config.restricted_countries.len(),
            products = config.restricted_product_ids.len(),
            "Loaded restriction settings"
        );
        self.cache.insert((), Arc::clone(&config)).await;
        Ok(config)
    }

    /// A checkout guard over the current configuration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings cannot be read.
    pub async fn guard(&self) -> Result<CheckoutGuard, RepositoryError> {
        Ok(CheckoutGuard::from_config(self.current().await?))
    }

    /// Replace the cached configuration without touching the database.
    pub async fn prime(&self, config: RestrictionConfig) {
        self.cache.insert((), Arc::new(config)).await;
    }
}
