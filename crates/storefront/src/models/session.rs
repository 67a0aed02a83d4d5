//! Session-related types.
//!
//! The visitor's server session replaces browser storage: it holds the
//! encrypted cart snapshot per country, the wishlist, and auth state.

use saffron_core::Country;
use serde::{Deserialize, Serialize};

use crate::shopify::CustomerAccessToken;

/// How the current customer signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomerSession {
    /// Customer Account API OAuth tokens.
    Oauth(CustomerAccessToken),
    /// Storefront API token from `customerAccessTokenCreate`.
    Classic {
        access_token: String,
        /// RFC 3339 expiry timestamp.
        expires_at: String,
    },
}

impl CustomerSession {
    /// The OAuth token, if the customer signed in through the Customer Account API.
    #[must_use]
    pub const fn oauth(&self) -> Option<&CustomerAccessToken> {
        match self {
            Self::Oauth(token) => Some(token),
            Self::Classic { .. } => None,
        }
    }

    /// Whether the credentials are past their expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self {
            Self::Oauth(token) => token.is_expired(),
            Self::Classic { expires_at, .. } => chrono::DateTime::parse_from_rfc3339(expires_at)
                .map_or(true, |expires_at| expires_at <= chrono::Utc::now()),
        }
    }
}

/// Session keys.
pub mod keys {
    use super::Country;

    /// Prefix of the versioned per-country cart snapshot key.
    pub const CART_PREFIX: &str = "cart:v1:";

    /// Key for the wishlist (unencrypted list of variant IDs).
    pub const WISHLIST: &str = "wishlist:v1";

    /// Key for the signed-in customer.
    pub const CUSTOMER: &str = "customer";

    /// Key for Shopify OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for Shopify OAuth nonce (`OpenID` Connect replay protection).
    pub const OAUTH_NONCE: &str = "oauth_nonce";

    /// Key for the page to return to after login.
    pub const RETURN_TO: &str = "return_to";

    /// Cart snapshot key for a country (e.g. `cart:v1:in`).
    #[must_use]
    pub fn cart(country: &Country) -> String {
        format!("{CART_PREFIX}{}", country.slug)
    }
}
