//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify identifies every node with a global ID of the form
//! `gid://shopify/{Resource}/{id}` (cart IDs additionally carry a `?key=`
//! suffix). Use the `define_gid!` macro to create wrappers that prevent
//! mixing IDs from different resources.

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` that checks the resource segment, `as_str()`, `legacy_id()`
/// - `Display` and `AsRef<str>`
///
/// # Example
///
/// ```rust
/// # use saffron_core::define_gid;
/// define_gid!(WidgetGid, "Widget");
///
/// let id = WidgetGid::parse("gid://shopify/Widget/42").unwrap();
/// assert_eq!(id.legacy_id(), "42");
/// assert!(WidgetGid::parse("gid://shopify/Gadget/42").is_none());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name carried in the ID.
            pub const RESOURCE: &'static str = $resource;

            /// Parse a global ID, returning `None` if it names another resource.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                let rest = raw.strip_prefix($crate::types::id::GID_PREFIX)?;
                let (resource, id) = rest.split_once('/')?;
                if resource != $resource || id.is_empty() {
                    return None;
                }
                Some(Self(raw.to_owned()))
            }

            /// Wrap a raw ID without validation (IDs returned by Shopify).
            #[must_use]
            pub fn new_unchecked(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The full global ID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The trailing numeric/opaque part, without any query string.
            #[must_use]
            pub fn legacy_id(&self) -> &str {
                let tail = self.0.rsplit('/').next().unwrap_or_default();
                tail.split('?').next().unwrap_or_default()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductGid, "Product");
define_gid!(VariantGid, "ProductVariant");
define_gid!(CartGid, "Cart");
define_gid!(CartLineGid, "CartLine");
define_gid!(OrderGid, "Order");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_gid() {
        let id = VariantGid::parse("gid://shopify/ProductVariant/4455").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/4455");
        assert_eq!(id.legacy_id(), "4455");
    }

    #[test]
    fn test_parse_rejects_other_resource() {
        assert!(VariantGid::parse("gid://shopify/Product/4455").is_none());
        assert!(VariantGid::parse("4455").is_none());
        assert!(VariantGid::parse("gid://shopify/ProductVariant/").is_none());
    }

    #[test]
    fn test_cart_gid_legacy_id_strips_key() {
        let id = CartGid::parse("gid://shopify/Cart/c1-abc?key=xyz").unwrap();
        assert_eq!(id.legacy_id(), "c1-abc");
    }

    #[test]
    fn test_serde_transparent() {
        let id = OrderGid::new_unchecked("gid://shopify/Order/1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Order/1\"");
    }
}
