//! Catalog and order-history sort options.
//!
//! The storefront exposes five catalog sort options in its URLs
//! (`?sort=price-asc`). Each maps to a Shopify sort key plus direction.

use serde::{Deserialize, Serialize};

/// Sort keys for product queries (`ProductSortKeys`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    Relevance,
    BestSelling,
    CreatedAt,
    Price,
    Title,
}

/// Sort keys for products inside a collection (`ProductCollectionSortKeys`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCollectionSortKey {
    Relevance,
    BestSelling,
    Created,
    Price,
    Title,
}

impl From<ProductSortKey> for ProductCollectionSortKey {
    fn from(key: ProductSortKey) -> Self {
        match key {
            ProductSortKey::Relevance => Self::Relevance,
            ProductSortKey::BestSelling => Self::BestSelling,
            ProductSortKey::CreatedAt => Self::Created,
            ProductSortKey::Price => Self::Price,
            ProductSortKey::Title => Self::Title,
        }
    }
}

/// Query configuration for one sort option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortConfig {
    pub key: ProductSortKey,
    pub reverse: bool,
}

/// A user-facing sort option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    /// Value used in `?sort=`.
    pub slug: &'static str,
    /// Label shown in the sort dropdown.
    pub title: &'static str,
    pub config: SortConfig,
}

/// The catalog sort options, in dropdown order. The first is the default.
pub const SORT_OPTIONS: [SortOption; 5] = [
    SortOption {
        slug: "relevance",
        title: "Relevance",
        config: SortConfig {
            key: ProductSortKey::Relevance,
            reverse: false,
        },
    },
    SortOption {
        slug: "trending",
        title: "Trending",
        config: SortConfig {
            key: ProductSortKey::BestSelling,
            reverse: false,
        },
    },
    SortOption {
        slug: "latest",
        title: "Latest arrivals",
        config: SortConfig {
            key: ProductSortKey::CreatedAt,
            reverse: true,
        },
    },
    SortOption {
        slug: "price-asc",
        title: "Price: Low to high",
        config: SortConfig {
            key: ProductSortKey::Price,
            reverse: false,
        },
    },
    SortOption {
        slug: "price-desc",
        title: "Price: High to low",
        config: SortConfig {
            key: ProductSortKey::Price,
            reverse: true,
        },
    },
];

/// Map a sort slug to its query configuration.
///
/// Returns `None` for anything other than the five listed options.
#[must_use]
pub fn sort_config(slug: &str) -> Option<SortConfig> {
    SORT_OPTIONS
        .iter()
        .find(|option| option.slug == slug)
        .map(|option| option.config)
}

/// Resolve an optional `?sort=` value, falling back to the default option.
#[must_use]
pub fn resolve_sort(slug: Option<&str>) -> SortOption {
    let default = SORT_OPTIONS[0];
    slug.and_then(|s| SORT_OPTIONS.iter().find(|option| option.slug == s))
        .copied()
        .unwrap_or(default)
}

/// Sort keys for customer orders (`OrderSortKeys`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSortKey {
    #[default]
    ProcessedAt,
    TotalPrice,
    Id,
}

impl OrderSortKey {
    /// Parse the `?sort=` field name used on the order history page.
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "date" | "processed_at" => Some(Self::ProcessedAt),
            "total" | "total_price" => Some(Self::TotalPrice),
            "number" | "order_number" => Some(Self::Id),
            _ => None,
        }
    }

    /// Field name used in URLs.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::ProcessedAt => "date",
            Self::TotalPrice => "total",
            Self::Id => "number",
        }
    }

    /// GraphQL enum value.
    #[must_use]
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::ProcessedAt => "PROCESSED_AT",
            Self::TotalPrice => "TOTAL_PRICE",
            Self::Id => "ID",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_total_over_five_options() {
        let expected = [
            ("relevance", ProductSortKey::Relevance, false),
            ("trending", ProductSortKey::BestSelling, false),
            ("latest", ProductSortKey::CreatedAt, true),
            ("price-asc", ProductSortKey::Price, false),
            ("price-desc", ProductSortKey::Price, true),
        ];
        assert_eq!(SORT_OPTIONS.len(), expected.len());
        for (slug, key, reverse) in expected {
            let config = sort_config(slug).unwrap();
            assert_eq!(config, SortConfig { key, reverse });
            // stable across calls
            assert_eq!(sort_config(slug), Some(config));
        }
    }

    #[test]
    fn test_unlisted_keys_are_undefined() {
        for slug in ["", "price", "PRICE-ASC", "newest", "best-selling"] {
            assert!(sort_config(slug).is_none(), "{slug} should be undefined");
        }
    }

    #[test]
    fn test_resolve_sort_defaults_to_relevance() {
        assert_eq!(resolve_sort(None).slug, "relevance");
        assert_eq!(resolve_sort(Some("bogus")).slug, "relevance");
        assert_eq!(resolve_sort(Some("latest")).slug, "latest");
    }

    #[test]
    fn test_collection_key_conversion() {
        assert_eq!(
            ProductCollectionSortKey::from(ProductSortKey::CreatedAt),
            ProductCollectionSortKey::Created
        );
        let json = serde_json::to_string(&ProductSortKey::BestSelling).unwrap();
        assert_eq!(json, "\"BEST_SELLING\"");
    }

    #[test]
    fn test_order_sort_fields() {
        assert_eq!(OrderSortKey::from_field("total"), Some(OrderSortKey::TotalPrice));
        assert_eq!(OrderSortKey::from_field("x"), None);
        assert_eq!(OrderSortKey::ProcessedAt.as_graphql(), "PROCESSED_AT");
        assert_eq!(
            OrderSortKey::from_field(OrderSortKey::Id.field()),
            Some(OrderSortKey::Id)
        );
    }
}
