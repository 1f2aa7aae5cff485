//! Plugin option storage: restriction settings and the installed version.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use sell_restrict_core::{RestrictionConfig, StoredSettings};

use super::RepositoryError;

/// Option name holding the restriction configuration.
pub const RESTRICTION_SETTINGS: &str = "restriction_settings";

/// Option name holding the installed version (a JSON string).
pub const VERSION_OPTION: &str = "plugin_version";

/// Prefix of short-lived cache rows owned by the plugin.
pub const TRANSIENT_PREFIX: &str = "transient_sell_restrict_";

/// Read/write access to plugin options.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the raw stored restriction settings, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_restriction_settings(&self) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>(
            "SELECT value FROM plugin_option WHERE name = $1",
        )
        .bind(RESTRICTION_SETTINGS)
        .fetch_optional(self.pool)
        .await?;

        Ok(value)
    }

    /// Merge `settings` into the stored record in a single statement and
    /// return the resulting value.
    ///
    /// Only the keys present in `settings` are written; other keys in the
    /// stored object are kept. A stored value that is not an object is
    /// replaced outright. Concurrent saves resolve as last write wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if serialization or the query fails.
    pub async fn save_restriction_settings(
        &self,
        settings: &StoredSettings,
    ) -> Result<JsonValue, RepositoryError> {
        let value = serde_json::to_value(settings)?;

        let saved = sqlx::query_scalar::<_, JsonValue>(
            r"
            INSERT INTO plugin_option (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET
                value = CASE
                    WHEN jsonb_typeof(plugin_option.value) = 'object'
                        THEN plugin_option.value || EXCLUDED.value
                    ELSE EXCLUDED.value
                END,
                updated_at = NOW()
            RETURNING value
            ",
        )
        .bind(RESTRICTION_SETTINGS)
        .bind(value)
        .fetch_one(self.pool)
        .await?;

        Ok(saved)
    }

    /// Write the default configuration unless one already exists, and
    /// record `version` as the installed version.
    ///
    /// Returns `true` when the defaults were written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the transaction fails.
    pub async fn install_defaults(&self, version: &str) -> Result<bool, RepositoryError> {
        let defaults = serde_json::to_value(RestrictionConfig::default().to_stored())?;
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query(
            r"
            INSERT INTO plugin_option (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(RESTRICTION_SETTINGS)
        .bind(defaults)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        sqlx::query(
            r"
            INSERT INTO plugin_option (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(VERSION_OPTION)
        .bind(JsonValue::String(version.to_string()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// The installed version, if recorded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn installed_version(&self) -> Result<Option<String>, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>(
            "SELECT value FROM plugin_option WHERE name = $1",
        )
        .bind(VERSION_OPTION)
        .fetch_optional(self.pool)
        .await?;

        Ok(value.and_then(|v| v.as_str().map(String::from)))
    }

    /// Delete every option the plugin owns. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn uninstall(&self) -> Result<u64, RepositoryError> {
        let removed = sqlx::query(
            r"
            DELETE FROM plugin_option
            WHERE name = $1 OR name = $2 OR starts_with(name, $3)
            ",
        )
        .bind(RESTRICTION_SETTINGS)
        .bind(VERSION_OPTION)
        .bind(TRANSIENT_PREFIX)
        .execute(self.pool)
        .await?
        .rows_affected();

        Ok(removed)
    }
}
