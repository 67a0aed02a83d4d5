//! Cart synchronization.
//!
//! The remote Shopify cart is authoritative. After every successful
//! mutation the local snapshot is overwritten from the response; there are
//! no optimistic updates and no retries. Quantity rules from
//! [`saffron_core::cart`] are enforced before anything is sent.

mod snapshot;

pub use snapshot::{CartItem, CartSnapshot, SnapshotCipher, SnapshotError};

use std::future::Future;

use saffron_core::cart::{QuantityError, check_quantity, clamp_quantity};
use saffron_core::{CartGid, CartLineGid, Country, VariantGid};
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::keys;
use crate::shopify::{Cart, CartLineInput, CartLineUpdateInput, ShopifyError, StorefrontClient};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error("That item is no longer in your cart")]
    LineNotFound,

    #[error("Your cart is empty")]
    NoCart,

    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl CartError {
    /// Message shown to the shopper in a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Quantity(_) | Self::LineNotFound | Self::NoCart => self.to_string(),
            Self::Shopify(ShopifyError::UserErrors(errors)) => errors
                .first()
                .map_or_else(|| "Could not update your cart".to_string(), |e| e.message.clone()),
            Self::Shopify(ShopifyError::RateLimited(_)) => {
                "We're a little busy right now. Please try again in a moment.".to_string()
            }
            Self::Shopify(_) | Self::Session(_) | Self::Snapshot(_) => {
                "Could not update your cart. Please try again.".to_string()
            }
        }
    }
}

// =============================================================================
// Remote cart API
// =============================================================================

/// Remote cart operations, implemented by [`StorefrontClient`].
pub trait CartApi: Send + Sync {
    fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
        country: &Country,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    fn get_cart(
        &self,
        cart_id: &CartGid,
        country: &Country,
    ) -> impl Future<Output = Result<Option<Cart>, ShopifyError>> + Send;

    fn add_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineInput>,
        country: &Country,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    fn update_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineUpdateInput>,
        country: &Country,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    fn remove_lines(
        &self,
        cart_id: &CartGid,
        line_ids: &[CartLineGid],
        country: &Country,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;
}

impl CartApi for StorefrontClient {
    async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        Self::create_cart(self, lines, country).await
    }

    async fn get_cart(
        &self,
        cart_id: &CartGid,
        country: &Country,
    ) -> Result<Option<Cart>, ShopifyError> {
        Self::get_cart(self, cart_id, country).await
    }

    async fn add_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineInput>,
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        Self::add_lines(self, cart_id, lines, country).await
    }

    async fn update_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineUpdateInput>,
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        Self::update_lines(self, cart_id, lines, country).await
    }

    async fn remove_lines(
        &self,
        cart_id: &CartGid,
        line_ids: &[CartLineGid],
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        Self::remove_lines(self, cart_id, line_ids, country).await
    }
}

// =============================================================================
// CartService
// =============================================================================

/// Cart operations for one visitor and one country.
pub struct CartService<'a, A> {
    api: &'a A,
    session: &'a Session,
    cipher: &'a SnapshotCipher,
    country: Country,
}

impl<'a, A: CartApi> CartService<'a, A> {
    #[must_use]
    pub const fn new(
        api: &'a A,
        session: &'a Session,
        cipher: &'a SnapshotCipher,
        country: Country,
    ) -> Self {
        Self {
            api,
            session,
            cipher,
            country,
        }
    }

    fn key(&self) -> String {
        keys::cart(&self.country)
    }

    /// Read the local snapshot. Missing or undecryptable snapshots are empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(&self) -> Result<CartSnapshot, CartError> {
        let Some(envelope) = self.session.get::<String>(&self.key()).await? else {
            return Ok(CartSnapshot::default());
        };

        match self.cipher.decrypt(&envelope) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, country = self.country.slug, "Discarding unreadable cart snapshot");
                Ok(CartSnapshot::default())
            }
        }
    }

    async fn save(&self, snapshot: &CartSnapshot) -> Result<(), CartError> {
        let envelope = self.cipher.encrypt(snapshot)?;
        self.session.insert(&self.key(), envelope).await?;
        Ok(())
    }

    async fn overwrite(&self, cart: &Cart) -> Result<CartSnapshot, CartError> {
        let snapshot = CartSnapshot::from(cart);
        self.save(&snapshot).await?;
        Ok(snapshot)
    }

    /// Drop the local snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear(&self) -> Result<(), CartError> {
        self.session.remove_value(&self.key()).await?;
        Ok(())
    }

    /// Refresh the snapshot from the remote cart.
    ///
    /// A cart that no longer exists (for example after checkout) clears the
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch or the session store fails.
    #[instrument(skip(self), fields(country = self.country.slug))]
    pub async fn resync(&self) -> Result<CartSnapshot, CartError> {
        let snapshot = self.load().await?;
        let Some(cart_id) = snapshot.cart_id else {
            return Ok(snapshot);
        };

        match self.api.get_cart(&cart_id, &self.country).await? {
            Some(cart) => self.overwrite(&cart).await,
            None => {
                tracing::info!("Remote cart is gone; clearing snapshot");
                self.clear().await?;
                Ok(CartSnapshot::default())
            }
        }
    }

    /// Add a variant, creating the remote cart on first use.
    ///
    /// The line's resulting quantity is clamped to `[1, 10]` and to stock.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Quantity` when the line is already at its limit,
    /// or any remote or session error.
    #[instrument(skip(self), fields(country = self.country.slug, variant_id = %variant_id))]
    pub async fn add(
        &self,
        variant_id: VariantGid,
        quantity: u32,
        quantity_available: Option<i64>,
    ) -> Result<CartSnapshot, CartError> {
        let snapshot = self.load().await?;
        let line = snapshot.line_for_variant(&variant_id);
        let existing = line.map_or(0, |item| item.quantity);
        // The remote cart's last reported stock bounds the form's value.
        let quantity_available =
            match (quantity_available, line.and_then(|item| item.quantity_available)) {
                (Some(form), Some(remote)) => Some(form.min(remote)),
                (form, remote) => form.or(remote),
            };
        let requested = existing.saturating_add(quantity);
        let target = clamp_quantity(requested, quantity_available);
        let delta = target.saturating_sub(existing);
        if delta == 0 {
            let error = check_quantity(requested, quantity_available)
                .err()
                .unwrap_or(QuantityError::AboveMaximum);
            return Err(error.into());
        }

        let lines = vec![CartLineInput {
            merchandise_id: variant_id,
            quantity: delta,
        }];

        let cart = match snapshot.cart_id {
            Some(cart_id) => self.api.add_lines(&cart_id, lines, &self.country).await?,
            None => self.api.create_cart(lines, &self.country).await?,
        };

        self.overwrite(&cart).await
    }

    /// Set a line's quantity.
    ///
    /// Out-of-range quantities are rejected without a network call. If the
    /// remote update fails, the cart is refetched before the error is
    /// returned so the snapshot matches the remote state.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Quantity`, `CartError::LineNotFound`, or the
    /// remote error.
    #[instrument(skip(self), fields(country = self.country.slug, line_id = %line_id))]
    pub async fn update_quantity(
        &self,
        line_id: &CartLineGid,
        quantity: u32,
    ) -> Result<CartSnapshot, CartError> {
        let snapshot = self.load().await?;
        let item = snapshot.line(line_id).ok_or(CartError::LineNotFound)?;
        let quantity = check_quantity(quantity, item.quantity_available)?;
        let cart_id = snapshot.cart_id.clone().ok_or(CartError::NoCart)?;

        let lines = vec![CartLineUpdateInput {
            id: line_id.clone(),
            quantity,
        }];

        match self.api.update_lines(&cart_id, lines, &self.country).await {
            Ok(cart) => self.overwrite(&cart).await,
            Err(error) => {
                tracing::warn!(error = %error, "Cart update failed; refetching remote cart");
                match self.api.get_cart(&cart_id, &self.country).await {
                    Ok(Some(cart)) => {
                        self.overwrite(&cart).await?;
                    }
                    Ok(None) => self.clear().await?,
                    Err(refetch) => {
                        tracing::warn!(error = %refetch, "Cart refetch failed");
                    }
                }
                Err(error.into())
            }
        }
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoCart` without a cart, or any remote error.
    #[instrument(skip(self), fields(country = self.country.slug, line_id = %line_id))]
    pub async fn remove(&self, line_id: &CartLineGid) -> Result<CartSnapshot, CartError> {
        let snapshot = self.load().await?;
        let cart_id = snapshot.cart_id.ok_or(CartError::NoCart)?;
        let cart = self
            .api
            .remove_lines(&cart_id, std::slice::from_ref(line_id), &self.country)
            .await?;
        self.overwrite(&cart).await
    }

    /// Checkout hand-off URL, if the cart has items.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn checkout_url(&self) -> Result<Option<String>, CartError> {
        let snapshot = self.load().await?;
        Ok(snapshot
            .checkout_url
            .filter(|_| !snapshot.items.is_empty()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::shopify::UserError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Create(u32),
        Get,
        Add(u32),
        Update(u32),
        Remove,
    }

    /// Scripted remote cart: every mutation answers with `next`.
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<Call>>,
        next: Mutex<Option<Cart>>,
        remote: Mutex<Option<Cart>>,
        fail_updates: bool,
    }

    impl FakeApi {
        fn answering(cart: Cart) -> Self {
            Self {
                next: Mutex::new(Some(cart.clone())),
                remote: Mutex::new(Some(cart)),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, call: Call) -> Result<Cart, ShopifyError> {
            self.calls.lock().unwrap().push(call);
            self.next
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ShopifyError::NotFound("cart".to_string()))
        }
    }

    impl CartApi for FakeApi {
        async fn create_cart(
            &self,
            lines: Vec<CartLineInput>,
            _country: &Country,
        ) -> Result<Cart, ShopifyError> {
            self.respond(Call::Create(lines[0].quantity))
        }

        async fn get_cart(
            &self,
            _cart_id: &CartGid,
            _country: &Country,
        ) -> Result<Option<Cart>, ShopifyError> {
            self.calls.lock().unwrap().push(Call::Get);
            Ok(self.remote.lock().unwrap().clone())
        }

        async fn add_lines(
            &self,
            _cart_id: &CartGid,
            lines: Vec<CartLineInput>,
            _country: &Country,
        ) -> Result<Cart, ShopifyError> {
            self.respond(Call::Add(lines[0].quantity))
        }

        async fn update_lines(
            &self,
            _cart_id: &CartGid,
            lines: Vec<CartLineUpdateInput>,
            _country: &Country,
        ) -> Result<Cart, ShopifyError> {
            if self.fail_updates {
                self.calls.lock().unwrap().push(Call::Update(lines[0].quantity));
                return Err(ShopifyError::UserErrors(vec![UserError {
                    field: None,
                    message: "Not enough stock".to_string(),
                    code: Some("MERCHANDISE_NOT_ENOUGH_STOCK".to_string()),
                }]));
            }
            self.respond(Call::Update(lines[0].quantity))
        }

        async fn remove_lines(
            &self,
            _cart_id: &CartGid,
            _line_ids: &[CartLineGid],
            _country: &Country,
        ) -> Result<Cart, ShopifyError> {
            self.respond(Call::Remove)
        }
    }

    fn cart(lines: &[(u32, i64, Option<i64>)]) -> Cart {
        let edges: Vec<_> = lines
            .iter()
            .map(|(n, quantity, available)| {
                json!({"node": {
                    "id": format!("gid://shopify/CartLine/{n}"),
                    "quantity": quantity,
                    "cost": {
                        "amountPerQuantity": {"amount": "10.0", "currencyCode": "USD"},
                        "totalAmount": {"amount": format!("{}.0", 10 * quantity), "currencyCode": "USD"}
                    },
                    "merchandise": {
                        "id": format!("gid://shopify/ProductVariant/{n}"),
                        "title": "100g",
                        "quantityAvailable": available,
                        "product": {"handle": format!("tea-{n}"), "title": format!("Tea {n}")}
                    }
                }})
            })
            .collect();
        let total: i64 = lines.iter().map(|(_, q, _)| q).sum();
        serde_json::from_value(json!({
            "id": "gid://shopify/Cart/c1?key=k",
            "checkoutUrl": "https://checkout.example/c1",
            "totalQuantity": total,
            "cost": {
                "subtotalAmount": {"amount": "0.0", "currencyCode": "USD"},
                "totalAmount": {"amount": "0.0", "currencyCode": "USD"}
            },
            "lines": {"edges": edges, "pageInfo": {"hasNextPage": false}}
        }))
        .unwrap()
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn cipher() -> SnapshotCipher {
        SnapshotCipher::from_base64(snapshot::tests::TEST_KEY).unwrap()
    }

    fn variant(n: u32) -> VariantGid {
        VariantGid::new_unchecked(format!("gid://shopify/ProductVariant/{n}"))
    }

    fn line(n: u32) -> CartLineGid {
        CartLineGid::new_unchecked(format!("gid://shopify/CartLine/{n}"))
    }

    #[tokio::test]
    async fn test_first_add_creates_cart_with_clamped_quantity() {
        let api = FakeApi::answering(cart(&[(1, 3, Some(3))]));
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());

        let snapshot = service.add(variant(1), 25, Some(3)).await.unwrap();
        assert_eq!(api.calls(), vec![Call::Create(3)]);
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(service.load().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_add_tops_up_existing_line_to_limit() {
        let api = FakeApi::answering(cart(&[(1, 8, None)]));
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        service.add(variant(1), 8, None).await.unwrap();

        *api.next.lock().unwrap() = Some(cart(&[(1, 10, None)]));
        service.add(variant(1), 5, None).await.unwrap();
        assert_eq!(api.calls(), vec![Call::Create(8), Call::Add(2)]);

        let err = service.add(variant(1), 1, None).await.unwrap_err();
        assert!(matches!(err, CartError::Quantity(QuantityError::AboveMaximum)));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_add_respects_stock_reported_by_remote_cart() {
        let api = FakeApi::answering(cart(&[(1, 2, Some(3))]));
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        service.add(variant(1), 2, None).await.unwrap();

        *api.next.lock().unwrap() = Some(cart(&[(1, 3, Some(3))]));
        service.add(variant(1), 5, None).await.unwrap();
        assert_eq!(api.calls(), vec![Call::Create(2), Call::Add(1)]);

        let err = service.add(variant(1), 1, Some(20)).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::Quantity(QuantityError::ExceedsStock { available: 3 })
        ));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_range_without_network() {
        let api = FakeApi::answering(cart(&[(1, 1, Some(4))]));
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        service.add(variant(1), 1, Some(4)).await.unwrap();

        for (quantity, expected) in [
            (0, QuantityError::BelowMinimum),
            (11, QuantityError::AboveMaximum),
            (5, QuantityError::ExceedsStock { available: 4 }),
        ] {
            let err = service.update_quantity(&line(1), quantity).await.unwrap_err();
            assert!(matches!(err, CartError::Quantity(e) if e == expected));
        }
        assert_eq!(api.calls(), vec![Call::Create(1)]);

        *api.next.lock().unwrap() = Some(cart(&[(1, 4, Some(4))]));
        let snapshot = service.update_quantity(&line(1), 4).await.unwrap();
        assert_eq!(snapshot.items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_failed_update_refetches_remote_cart() {
        let api = FakeApi {
            fail_updates: true,
            ..FakeApi::answering(cart(&[(1, 2, Some(5))]))
        };
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        service.add(variant(1), 2, Some(5)).await.unwrap();

        *api.remote.lock().unwrap() = Some(cart(&[(1, 1, Some(1))]));
        let err = service.update_quantity(&line(1), 3).await.unwrap_err();
        assert_eq!(err.user_message(), "Not enough stock");
        assert_eq!(api.calls(), vec![Call::Create(2), Call::Update(3), Call::Get]);
        assert_eq!(service.load().await.unwrap().items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_resync_clears_when_remote_cart_is_gone() {
        let api = FakeApi::answering(cart(&[(1, 1, None)]));
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        service.add(variant(1), 1, None).await.unwrap();

        *api.remote.lock().unwrap() = None;
        let snapshot = service.resync().await.unwrap();
        assert!(snapshot.cart_id.is_none());
        assert!(service.load().await.unwrap().cart_id.is_none());
        assert_eq!(service.checkout_url().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshots_are_per_country() {
        let api = FakeApi::answering(cart(&[(1, 1, None)]));
        let session = session();
        let cipher = cipher();
        let us = CartService::new(&api, &session, &cipher, Country::default());
        us.add(variant(1), 1, None).await.unwrap();

        let india = CartService::new(&api, &session, &cipher, Country::from_slug("in").unwrap());
        assert!(india.load().await.unwrap().is_empty());
        assert!(!us.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let api = FakeApi::default();
        let session = session();
        let cipher = cipher();
        session
            .insert(&keys::cart(&Country::default()), "v1:garbage:data")
            .await
            .unwrap();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        assert!(service.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_without_cart() {
        let api = FakeApi::default();
        let session = session();
        let cipher = cipher();
        let service = CartService::new(&api, &session, &cipher, Country::default());
        assert!(matches!(service.remove(&line(1)).await, Err(CartError::NoCart)));
        assert!(api.calls().is_empty());
    }
}
