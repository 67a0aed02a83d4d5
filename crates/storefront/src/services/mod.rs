//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Customer sign-in (OAuth and email/password)
//! - `cart` - Cart synchronization with an encrypted local snapshot
//! - `orders` - Order history paging and search
//! - `wishlist` - Session-backed wishlist

pub mod auth;
pub mod cart;
pub mod orders;
pub mod wishlist;
