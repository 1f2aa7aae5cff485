//! Install, uninstall and settings inspection.

use sell_restrict_admin::db::SettingsRepository;
use sell_restrict_admin::services::SettingsStore;

use super::connect;

/// Version recorded on install.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Write the default configuration unless one exists; always record the
/// installed version.
///
/// # Errors
///
/// Returns an error if the connection or the writes fail.
pub async fn install() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let created = SettingsRepository::new(&pool).install_defaults(VERSION).await?;
    if created {
        tracing::info!("Default restriction settings written");
    } else {
        tracing::info!("Existing restriction settings kept");
    }
    tracing::info!("Installed version {VERSION}");
    Ok(())
}

/// Delete every option the plugin owns.
///
/// # Errors
///
/// Returns an error if `confirmed` is false, or the connection or delete fails.
pub async fn uninstall(confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("refusing to delete plugin data without --yes".into());
    }

    let pool = connect().await?;
    let removed = SettingsRepository::new(&pool).uninstall().await?;

    tracing::info!(removed, "Plugin data removed");
    Ok(())
}

/// Print the effective settings as JSON.
///
/// # Errors
///
/// Returns an error if the connection or the read fails.
pub async fn show_settings() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let config = SettingsStore::new(&pool).get().await?;
    match SettingsRepository::new(&pool).installed_version().await? {
        Some(version) => tracing::info!("Installed version {version}"),
        None => tracing::warn!("No installed version recorded; run `sr-cli install`"),
    }

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }
    Ok(())
}
