//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Token-based role login
//! - `settings` - The Settings Store: read merged over defaults, sanitize and save

pub mod auth;
pub mod settings;

pub use auth::{AdminAuthService, AuthError};
pub use settings::SettingsStore;
