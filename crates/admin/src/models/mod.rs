//! Domain models for admin.

pub mod session;

pub use session::{AdminRole, CurrentAdmin, keys as session_keys};
