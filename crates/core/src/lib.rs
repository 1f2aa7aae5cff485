//! Sell Restrict Core - Restriction rules and shared types.
//!
//! This crate provides the domain logic shared by all Sell Restrict components:
//! - `storefront` - Customer-facing cart, checkout and removal endpoint
//! - `admin` - Settings page and product search
//! - `cli` - Migrations, install and uninstall
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Settings, carts and customer locations are handed in by the
//! binaries, which keeps every rule here testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, country codes, prices, the cart model and notices
//! - [`restriction`] - Settings, the restriction evaluator, location resolution,
//!   the checkout guard and removal planning

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod restriction;
pub mod types;

pub use restriction::*;
pub use types::*;
