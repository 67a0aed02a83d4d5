//! Core types for the Saffron Lane storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod id;
pub mod price;
pub mod status;

pub use country::{COUNTRIES, Country};
pub use id::*;
pub use price::{Price, currency_symbol, format_money};
pub use status::*;
