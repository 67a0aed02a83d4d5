//! Domain types for the Shopify Storefront API.
//!
//! These deserialize directly from Storefront API responses (camelCase
//! field names). Lists that Shopify returns as connections keep the
//! connection shape so pages can be spliced and cursors reused.

use saffron_core::connection::Connection;
use saffron_core::{CartGid, CartLineGid, Price, ProductGid, VariantGid};
use serde::{Deserialize, Serialize};

// =============================================================================
// Shared
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "250g").
    pub value: String,
}

/// One value of a product option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptionValue {
    pub name: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    #[serde(default)]
    pub option_values: Vec<ProductOptionValue>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantGid,
    /// Variant title (combination of option values).
    pub title: String,
    pub available_for_sale: bool,
    /// Units in stock; `None` when inventory is not tracked.
    #[serde(default)]
    pub quantity_available: Option<i64>,
    pub price: Price,
    /// Original price when on sale.
    #[serde(default)]
    pub compare_at_price: Option<Price>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<Image>,
}

/// Minimum and maximum variant prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Price,
    #[serde(default)]
    pub max_variant_price: Option<Price>,
}

/// A product in the store.
///
/// Listing queries fetch a subset of fields; the rest default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductGid,
    /// URL handle.
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub available_for_sale: bool,
    #[serde(default)]
    pub featured_image: Option<Image>,
    pub price_range: PriceRange,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub images: Connection<Image>,
    #[serde(default)]
    pub variants: Connection<ProductVariant>,
    #[serde(default)]
    pub seo: Seo,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Product {
    /// The variant selected by `?variant=`, falling back to the first
    /// available variant and then the first variant.
    #[must_use]
    pub fn selected_variant(&self, requested: Option<&str>) -> Option<&ProductVariant> {
        requested
            .and_then(|requested| {
                self.variants
                    .nodes()
                    .find(|v| v.id.as_str() == requested || v.id.legacy_id() == requested)
            })
            .or_else(|| self.variants.nodes().find(|v| v.available_for_sale))
            .or_else(|| self.variants.nodes().next())
    }
}

// =============================================================================
// Collections
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub products: Connection<Product>,
    #[serde(default)]
    pub seo: Seo,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// Product summary attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub handle: String,
    pub title: String,
}

/// The variant a cart line holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    pub id: VariantGid,
    pub title: String,
    #[serde(default)]
    pub quantity_available: Option<i64>,
    #[serde(default)]
    pub image: Option<Image>,
    pub product: CartProduct,
}

/// Cost of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    pub amount_per_quantity: Price,
    pub total_amount: Price,
}

/// A line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineGid,
    pub quantity: i64,
    pub cost: CartLineCost,
    pub merchandise: CartMerchandise,
}

/// Cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Price,
    pub total_amount: Price,
}

/// A Shopify cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartGid,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: CartCost,
    pub lines: Connection<CartLine>,
}

/// Line to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: VariantGid,
    pub quantity: u32,
}

/// Quantity change for an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineUpdateInput {
    pub id: CartLineGid,
    pub quantity: u32,
}

// =============================================================================
// Wishlist lookups
// =============================================================================

/// Product summary attached to a wishlist variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantProduct {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
}

/// A variant resolved through `nodes(ids:)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub id: VariantGid,
    pub title: String,
    pub available_for_sale: bool,
    #[serde(default)]
    pub quantity_available: Option<i64>,
    pub price: Price,
    #[serde(default)]
    pub image: Option<Image>,
    pub product: VariantProduct,
}

/// A `nodes(ids:)` entry; anything other than a variant is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum VariantNode {
    ProductVariant(VariantSummary),
    #[serde(other)]
    Other,
}

// =============================================================================
// Navigation and content
// =============================================================================

/// A navigation menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A menu entry. `url` is absolute on the shop's own domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A legal policy page (privacy, refund, shipping, terms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopPolicy {
    pub handle: String,
    pub title: String,
    /// HTML body.
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
}

// =============================================================================
// Classic customer accounts
// =============================================================================

/// Token issued by `customerAccessTokenCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontCustomerToken {
    pub access_token: String,
    /// RFC 3339 expiry timestamp.
    pub expires_at: String,
}

/// Customer profile read with a Storefront customer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Sitemap
// =============================================================================

/// A handle with its last modification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleEntry {
    pub handle: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}
