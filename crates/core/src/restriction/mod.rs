//! Purchase restriction rules.
//!
//! - [`config`]: the admin-managed configuration and its sanitization
//! - [`evaluator`]: which cart lines are restricted for a country
//! - [`location`]: resolving the customer's country for a request
//! - [`guard`]: checkout stages, the per-request notice latch
//! - [`removal`]: removing restricted lines on request

pub mod config;
pub mod evaluator;
pub mod guard;
pub mod location;
pub mod removal;
pub mod sanitize;

pub use config::{DEFAULT_RESTRICTION_MESSAGE, RestrictionConfig, SettingsUpdate, StoredSettings};
pub use evaluator::{ProductNotice, RestrictedItem, RestrictionEvaluator};
pub use guard::{CheckoutGuard, CheckoutStage, GuardOutcome, GuardState, RequestContext};
pub use location::{CountryCandidates, LocationSource, LocationSources, ResolvedLocation};
pub use removal::{RemovalError, RemovalSummary, parse_product_ids, remove_product_lines};
pub use sanitize::{sanitize_rich_text, sanitize_text_field};
