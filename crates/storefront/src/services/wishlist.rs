//! Session-backed wishlist.
//!
//! Stored unencrypted under [`keys::WISHLIST`] as a JSON list of variant IDs.

use saffron_core::wishlist::Wishlist;
use saffron_core::{Country, VariantGid};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use crate::models::keys;
use crate::shopify::{ShopifyError, StorefrontClient, VariantSummary};

/// Wishlist persistence for one visitor.
pub struct WishlistStore<'a> {
    session: &'a Session,
}

impl<'a> WishlistStore<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Load the wishlist; empty on first visit.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(&self) -> Result<Wishlist, SessionError> {
        Ok(self
            .session
            .get::<Wishlist>(keys::WISHLIST)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, wishlist: &Wishlist) -> Result<(), SessionError> {
        self.session.insert(keys::WISHLIST, wishlist).await
    }

    /// Toggle a variant. Returns whether it is now saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn toggle(&self, variant_id: &VariantGid) -> Result<bool, SessionError> {
        let mut wishlist = self.load().await?;
        let saved = wishlist.toggle(variant_id.as_str());
        self.save(&wishlist).await?;
        Ok(saved)
    }

    /// Save a variant. No-op if already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn add(&self, variant_id: &VariantGid) -> Result<(), SessionError> {
        let mut wishlist = self.load().await?;
        if wishlist.add(variant_id.as_str()) {
            self.save(&wishlist).await?;
        }
        Ok(())
    }

    /// Remove a variant. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn remove(&self, variant_id: &VariantGid) -> Result<(), SessionError> {
        let mut wishlist = self.load().await?;
        if wishlist.remove(variant_id.as_str()) {
            self.save(&wishlist).await?;
        }
        Ok(())
    }
}

/// Resolve saved IDs with batched lookups, in wishlist order.
///
/// IDs that no longer resolve are left out of the result but stay saved.
///
/// # Errors
///
/// Returns an error if the Storefront request fails.
pub async fn resolve(
    storefront: &StorefrontClient,
    wishlist: &Wishlist,
    country: &Country,
) -> Result<Vec<VariantSummary>, ShopifyError> {
    let mut variants = storefront.get_variants(wishlist.ids(), country).await?;
    variants.sort_by_key(|variant| {
        wishlist
            .ids()
            .iter()
            .position(|id| id == variant.id.as_str())
            .unwrap_or(usize::MAX)
    });
    Ok(variants)
}
