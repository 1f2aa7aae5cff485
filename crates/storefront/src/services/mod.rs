//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer password login
//! - `cart` - Session-backed cart storage
//! - `catalog` - Cached product lookups
//! - `location` - Customer country resolution
//! - `notices` - Notices queued for the next render
//! - `settings` - Cached restriction configuration

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod location;
pub mod notices;
pub mod settings;

pub use catalog::CatalogService;
pub use settings::SettingsProvider;
