//! Key generation.
//!
//! ```bash
//! echo "STOREFRONT_CART_KEY=$(saffron-cli cart-key)" >> .env
//! ```
//!
//! Rotating the key makes existing cart snapshots unreadable; the
//! storefront discards them and visitors start with an empty cart.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use saffron_storefront::services::cart::{SnapshotCipher, SnapshotError};

/// A fresh base64-encoded 32-byte key.
#[must_use]
pub fn generate_cart_key() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    STANDARD.encode(bytes)
}

/// Print a new cart snapshot key.
///
/// # Errors
///
/// Returns an error if the generated key is rejected by the cipher.
pub fn cart_key() -> Result<(), SnapshotError> {
    let key = generate_cart_key();
    SnapshotCipher::from_base64(&key)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{key}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_usable_and_distinct() {
        let first = generate_cart_key();
        let second = generate_cart_key();

        assert_ne!(first, second);
        assert_eq!(STANDARD.decode(&first).map(|b| b.len()).ok(), Some(32));
        assert!(SnapshotCipher::from_base64(&first).is_ok());
    }
}
