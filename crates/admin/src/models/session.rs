//! Session-related types for admin authentication.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Admin role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// May change restriction settings and search the catalog.
    ShopManager,
    /// Read-only access to the settings page.
    Viewer,
}

impl AdminRole {
    /// Whether this role may change settings and search products.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::ShopManager)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShopManager => "shop_manager",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-stored admin identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub role: AdminRole,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
