//! Sell Restrict CLI - migrations, install and uninstall.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sr-cli migrate
//!
//! # Write default settings (only if none exist) and record the version
//! sr-cli install
//!
//! # Remove every option the plugin owns
//! sr-cli uninstall --yes
//!
//! # Print the effective restriction settings
//! sr-cli settings show
//!
//! # Create a storefront customer with saved countries
//! sr-cli customer create -e buyer@example.com -p 'long password' --billing-country US
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL`, `STOREFRONT_DATABASE_URL` or `DATABASE_URL` -
//!   `PostgreSQL` connection string (first one set wins)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Sell Restrict CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Write default settings if none exist and record the installed version
    Install,
    /// Delete all plugin settings and cached data
    Uninstall {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Inspect restriction settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Manage storefront customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the stored settings merged over defaults, as JSON
    Show,
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Create a customer account
    Create {
        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Login password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Saved billing country code
        #[arg(long)]
        billing_country: Option<String>,

        /// Saved shipping country code
        #[arg(long)]
        shipping_country: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Install => commands::plugin::install().await?,
        Commands::Uninstall { yes } => commands::plugin::uninstall(yes).await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::plugin::show_settings().await?,
        },
        Commands::Customer { action } => match action {
            CustomerAction::Create {
                email,
                password,
                billing_country,
                shipping_country,
            } => {
                commands::customer::create(
                    &email,
                    &password,
                    billing_country.as_deref(),
                    shipping_country.as_deref(),
                )
                .await?;
            }
        },
    }
    Ok(())
}
