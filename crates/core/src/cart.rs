//! Cart line quantity rules.
//!
//! A line holds between [`MIN_LINE_QUANTITY`] and [`MAX_LINE_QUANTITY`]
//! units and never more than Shopify reports as `quantityAvailable`.
//! Adds are clamped into range; explicit quantity updates that fall outside
//! it are rejected before any request is sent.

use thiserror::Error;

/// Smallest quantity a cart line may hold.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Largest quantity a cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// Why a requested quantity was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("Quantity must be at least {MIN_LINE_QUANTITY}")]
    BelowMinimum,
    #[error("You can add at most {MAX_LINE_QUANTITY} of this item")]
    AboveMaximum,
    #[error("Only {available} left in stock")]
    ExceedsStock { available: u32 },
}

/// Effective upper bound for a line given remote stock.
///
/// `None` means inventory is not tracked. Negative stock (oversold) counts
/// as zero.
#[must_use]
pub fn line_limit(available: Option<i64>) -> u32 {
    available.map_or(MAX_LINE_QUANTITY, |stock| {
        let stock = u32::try_from(stock.max(0)).unwrap_or(u32::MAX);
        stock.min(MAX_LINE_QUANTITY)
    })
}

/// Clamp a requested quantity into `[1, limit]`.
///
/// When stock is exhausted the result is still 1; the platform rejects the
/// mutation and the error is shown to the shopper.
#[must_use]
pub fn clamp_quantity(requested: u32, available: Option<i64>) -> u32 {
    let limit = line_limit(available).max(MIN_LINE_QUANTITY);
    requested.clamp(MIN_LINE_QUANTITY, limit)
}

/// Validate an explicit quantity update.
///
/// # Errors
///
/// Returns a [`QuantityError`] when the quantity is below the minimum, above
/// the fixed maximum, or above the remote-reported stock.
pub fn check_quantity(requested: u32, available: Option<i64>) -> Result<u32, QuantityError> {
    if requested < MIN_LINE_QUANTITY {
        return Err(QuantityError::BelowMinimum);
    }
    if requested > MAX_LINE_QUANTITY {
        return Err(QuantityError::AboveMaximum);
    }
    if let Some(stock) = available {
        let stock = u32::try_from(stock.max(0)).unwrap_or(u32::MAX);
        if requested > stock {
            return Err(QuantityError::ExceedsStock { available: stock });
        }
    }
    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_into_range() {
        assert_eq!(clamp_quantity(0, None), 1);
        assert_eq!(clamp_quantity(4, None), 4);
        assert_eq!(clamp_quantity(25, None), 10);
        assert_eq!(clamp_quantity(8, Some(3)), 3);
        assert_eq!(clamp_quantity(8, Some(50)), 8);
        assert_eq!(clamp_quantity(3, Some(0)), 1);
        assert_eq!(clamp_quantity(3, Some(-2)), 1);
    }

    #[test]
    fn test_check_rejects_out_of_range() {
        assert_eq!(check_quantity(0, None), Err(QuantityError::BelowMinimum));
        assert_eq!(check_quantity(11, None), Err(QuantityError::AboveMaximum));
        assert_eq!(
            check_quantity(5, Some(4)),
            Err(QuantityError::ExceedsStock { available: 4 })
        );
        assert_eq!(check_quantity(4, Some(4)), Ok(4));
        assert_eq!(check_quantity(10, None), Ok(10));
    }

    #[test]
    fn test_accepted_updates_never_exceed_limits() {
        let stocks = [None, Some(-1), Some(0), Some(1), Some(3), Some(9), Some(10), Some(11), Some(500)];
        for available in stocks {
            for requested in 0..=40 {
                if let Ok(quantity) = check_quantity(requested, available) {
                    assert!(quantity <= MAX_LINE_QUANTITY);
                    assert!(quantity >= MIN_LINE_QUANTITY);
                    if let Some(stock) = available {
                        assert!(i64::from(quantity) <= stock);
                    }
                }
                let clamped = clamp_quantity(requested, available);
                assert!(clamped <= MAX_LINE_QUANTITY);
                assert!(clamped >= MIN_LINE_QUANTITY);
            }
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QuantityError::ExceedsStock { available: 2 }.to_string(),
            "Only 2 left in stock"
        );
        assert_eq!(
            QuantityError::AboveMaximum.to_string(),
            "You can add at most 10 of this item"
        );
    }
}
