//! Restriction settings, read side.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::RepositoryError;

/// Option name holding the restriction configuration.
pub const RESTRICTION_SETTINGS: &str = "restriction_settings";

/// Read-only access to plugin options.
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
}
