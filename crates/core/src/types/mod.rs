//! Core types for Sell Restrict.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod country;
pub mod id;
pub mod notice;
pub mod price;

pub use cart::{Cart, CartLineItem, CartTotals, LineKey};
pub use country::{COUNTRIES, CountryCode, CountryCodeError, country_name};
pub use id::*;
pub use notice::{
    CHECKOUT_BLOCKED_MESSAGE, Notice, NoticeBody, NoticeKind, RESTRICTION_NOTICE_TITLE, RestrictedLine,
};
pub use price::{CurrencyCode, Price};
