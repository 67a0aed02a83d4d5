//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::cart::{SnapshotCipher, SnapshotError};
use crate::shopify::{CustomerClient, StorefrontClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    storefront: StorefrontClient,
    customer: CustomerClient,
    cipher: SnapshotCipher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `pool` backs the session store when a database is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart key is not a valid 32-byte key.
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Result<Self, SnapshotError> {
        let storefront = StorefrontClient::new(&config.shopify);
        let customer = CustomerClient::new(&config.shopify);
        let cipher = SnapshotCipher::from_base64(config.cart_key.expose_secret())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storefront,
                customer,
                cipher,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The session database pool, if sessions are stored in Postgres.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the Shopify Customer Account API client.
    #[must_use]
    pub fn customer(&self) -> &CustomerClient {
        &self.inner.customer
    }

    /// Cipher for the encrypted cart snapshot.
    #[must_use]
    pub fn cipher(&self) -> &SnapshotCipher {
        &self.inner.cipher
    }
}
