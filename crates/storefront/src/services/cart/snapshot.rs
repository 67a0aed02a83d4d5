//! Local cart snapshot and its at-rest encryption.
//!
//! The snapshot mirrors the last authoritative cart returned by Shopify and
//! is stored in the session as `v1:{nonce}:{ciphertext}` (URL-safe base64,
//! ChaCha20-Poly1305). The key is static configuration, so this keeps the
//! snapshot opaque in the session store rather than secret from the server.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use saffron_core::{CartGid, CartLineGid, Price, VariantGid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shopify::Cart;

const ENVELOPE_VERSION: &str = "v1";
const NONCE_LENGTH: usize = 12;

/// Errors reading or writing an encrypted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid cart key: {0}")]
    InvalidKey(String),
    #[error("unsupported snapshot envelope")]
    Envelope,
    #[error("snapshot is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("snapshot could not be encrypted")]
    Encrypt,
    #[error("snapshot could not be decrypted")]
    Decrypt,
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of the local cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub line_id: CartLineGid,
    pub variant_id: VariantGid,
    pub product_handle: String,
    pub title: String,
    pub variant_title: String,
    pub quantity: u32,
    /// Remote-reported stock; `None` when not tracked.
    pub quantity_available: Option<i64>,
    /// Unit price.
    pub price: Price,
    pub line_total: Price,
    pub image_url: Option<String>,
}

impl CartItem {
    /// Largest quantity this line may be set to.
    #[must_use]
    pub fn max_quantity(&self) -> u32 {
        saffron_core::cart::line_limit(self.quantity_available)
    }
}

/// Locally persisted view of the remote cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub cart_id: Option<CartGid>,
    pub items: Vec<CartItem>,
    pub checkout_url: Option<String>,
    pub item_count: u32,
    pub subtotal_amount: Option<Price>,
    pub total_amount: Option<Price>,
}

impl CartSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn line(&self, line_id: &CartLineGid) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.line_id == line_id)
    }

    #[must_use]
    pub fn line_for_variant(&self, variant_id: &VariantGid) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.variant_id == variant_id)
    }
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        let items: Vec<CartItem> = cart
            .lines
            .nodes()
            .map(|line| CartItem {
                line_id: line.id.clone(),
                variant_id: line.merchandise.id.clone(),
                product_handle: line.merchandise.product.handle.clone(),
                title: line.merchandise.product.title.clone(),
                variant_title: line.merchandise.title.clone(),
                quantity: u32::try_from(line.quantity.max(0)).unwrap_or(u32::MAX),
                quantity_available: line.merchandise.quantity_available,
                price: line.cost.amount_per_quantity.clone(),
                line_total: line.cost.total_amount.clone(),
                image_url: line.merchandise.image.as_ref().map(|i| i.url.clone()),
            })
            .collect();

        Self {
            cart_id: Some(cart.id.clone()),
            item_count: u32::try_from(cart.total_quantity.max(0)).unwrap_or(u32::MAX),
            items,
            checkout_url: Some(cart.checkout_url.clone()),
            subtotal_amount: Some(cart.cost.subtotal_amount.clone()),
            total_amount: Some(cart.cost.total_amount.clone()),
        }
    }
}

/// Encrypts snapshots for storage in the session.
#[derive(Clone)]
pub struct SnapshotCipher {
    cipher: ChaCha20Poly1305,
}

impl std::fmt::Debug for SnapshotCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SnapshotCipher([REDACTED])")
    }
}

impl SnapshotCipher {
    /// Build from a base64-encoded (standard alphabet) 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::InvalidKey` if the key does not decode to 32 bytes.
    pub fn from_base64(key: &str) -> Result<Self, SnapshotError> {
        let bytes = STANDARD
            .decode(key.trim())
            .map_err(|e| SnapshotError::InvalidKey(e.to_string()))?;
        let cipher = ChaCha20Poly1305::new_from_slice(&bytes)
            .map_err(|_| SnapshotError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))?;
        Ok(Self { cipher })
    }

    /// Serialize and encrypt a snapshot with a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or encryption fails.
    pub fn encrypt(&self, snapshot: &CartSnapshot) -> Result<String, SnapshotError> {
        let plaintext = serde_json::to_vec(snapshot)?;
        let nonce: [u8; NONCE_LENGTH] = rand::random();
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|_| SnapshotError::Encrypt)?;

        Ok(format!(
            "{ENVELOPE_VERSION}:{}:{}",
            URL_SAFE_NO_PAD.encode(nonce),
            URL_SAFE_NO_PAD.encode(ciphertext)
        ))
    }

    /// Decrypt and deserialize a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown envelope version, bad encoding, a
    /// failed authentication tag, or malformed JSON.
    pub fn decrypt(&self, envelope: &str) -> Result<CartSnapshot, SnapshotError> {
        let mut parts = envelope.splitn(3, ':');
        let (Some(ENVELOPE_VERSION), Some(nonce), Some(ciphertext)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SnapshotError::Envelope);
        };

        let nonce = URL_SAFE_NO_PAD.decode(nonce)?;
        if nonce.len() != NONCE_LENGTH {
            return Err(SnapshotError::Envelope);
        }
        let ciphertext = URL_SAFE_NO_PAD.decode(ciphertext)?;

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| SnapshotError::Decrypt)?;

        Ok(serde_json::from_slice(&plaintext)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TEST_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

    fn snapshot() -> CartSnapshot {
        CartSnapshot {
            cart_id: Some(CartGid::new_unchecked("gid://shopify/Cart/c1?key=k")),
            items: vec![CartItem {
                line_id: CartLineGid::new_unchecked("gid://shopify/CartLine/1"),
                variant_id: VariantGid::new_unchecked("gid://shopify/ProductVariant/10"),
                product_handle: "masala-chai".to_string(),
                title: "Masala Chai".to_string(),
                variant_title: "250g".to_string(),
                quantity: 2,
                quantity_available: Some(3),
                price: Price::new(rust_decimal::Decimal::new(450, 0), "INR".to_string()),
                line_total: Price::new(rust_decimal::Decimal::new(900, 0), "INR".to_string()),
                image_url: None,
            }],
            checkout_url: Some("https://checkout.example/c1".to_string()),
            item_count: 2,
            subtotal_amount: None,
            total_amount: None,
        }
    }

    #[test]
    fn test_envelope_shape_and_fresh_nonce() {
        let cipher = SnapshotCipher::from_base64(TEST_KEY).unwrap();
        let a = cipher.encrypt(&snapshot()).unwrap();
        let b = cipher.encrypt(&snapshot()).unwrap();
        assert!(a.starts_with("v1:"));
        assert_eq!(a.split(':').count(), 3);
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), snapshot());
    }

    #[test]
    fn test_tampered_or_foreign_envelopes_fail() {
        let cipher = SnapshotCipher::from_base64(TEST_KEY).unwrap();
        let envelope = cipher.encrypt(&snapshot()).unwrap();

        let other = SnapshotCipher::from_base64(&STANDARD.encode([7u8; 32])).unwrap();
        assert!(matches!(other.decrypt(&envelope), Err(SnapshotError::Decrypt)));

        let legacy = envelope.replacen("v1:", "v0:", 1);
        assert!(matches!(cipher.decrypt(&legacy), Err(SnapshotError::Envelope)));
        assert!(cipher.decrypt("not an envelope").is_err());
    }

    #[test]
    fn test_rejects_short_key() {
        assert!(matches!(
            SnapshotCipher::from_base64(&STANDARD.encode([1u8; 16])),
            Err(SnapshotError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_max_quantity_follows_stock() {
        let snapshot = snapshot();
        assert_eq!(snapshot.items[0].max_quantity(), 3);
    }
}
