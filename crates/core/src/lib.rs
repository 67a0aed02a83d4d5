//! Saffron Lane Core - Shared storefront rules.
//!
//! This crate provides the domain rules used by the storefront and the CLI:
//! - `storefront` - Public-facing e-commerce site
//! - `cli` - Operator tools (migrations, theme preview)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Everything that talks to the commerce
//! platform lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Countries, currencies, Shopify global IDs and statuses
//! - [`cart`] - Line quantity limits
//! - [`connection`] - Cursor-paginated connections and edge splicing
//! - [`sort`] - Catalog sort options
//! - [`text`] - Slug helpers
//! - [`theme`] - Seasonal theme selection
//! - [`wishlist`] - Deduplicated wishlist set

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod connection;
pub mod sort;
pub mod text;
pub mod theme;
pub mod types;
pub mod wishlist;

pub use types::*;
