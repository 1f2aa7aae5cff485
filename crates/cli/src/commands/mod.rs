//! CLI subcommands.

pub mod customer;
pub mod migrate;
pub mod plugin;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No database URL variable is set.
    #[error("Missing environment variable: one of {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

const DATABASE_URL_VARS: [&str; 3] = ["ADMIN_DATABASE_URL", "STOREFRONT_DATABASE_URL", "DATABASE_URL"];

/// Connect using the first database URL variable that is set.
///
/// # Errors
///
/// Returns `CommandError` if no variable is set or the connection fails.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = DATABASE_URL_VARS
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .map(SecretString::from)
        .ok_or(CommandError::MissingEnvVar(
            "ADMIN_DATABASE_URL, STOREFRONT_DATABASE_URL, DATABASE_URL",
        ))?;

    tracing::info!("Connecting to database...");
    Ok(sell_restrict_admin::db::create_pool(&database_url).await?)
}
