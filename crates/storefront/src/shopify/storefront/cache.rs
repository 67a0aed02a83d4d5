//! Cache types for Storefront API responses.

use saffron_core::connection::Connection;

use crate::shopify::types::{Collection, Menu, Product, ShopPolicy};

/// Cached value types.
///
/// Keys are strings that include the country code, since prices differ per
/// market.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Connection<Product>),
    Collection(Box<Collection>),
    Collections(Connection<Collection>),
    Menu(Menu),
    Policies(Vec<ShopPolicy>),
}

/// Build a cache key from its parts.
pub fn key(kind: &str, parts: &[&str]) -> String {
    let mut key = String::from(kind);
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_includes_every_part() {
        assert_eq!(key("product", &["IN", "chai"]), "product:IN:chai");
        assert_eq!(key("policies", &[]), "policies");
        assert_ne!(key("product", &["IN", "chai"]), key("product", &["US", "chai"]));
    }
}
