//! Status enums for orders and fulfillments.
//!
//! Values mirror the Customer Account API enums. Unrecognized values
//! deserialize to `Other` so a new upstream status never breaks the order
//! history page.

use serde::{Deserialize, Serialize};

/// Fulfillment event status (Customer Account API `FulfillmentStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Success,
    #[default]
    Pending,
    Open,
    Failure,
    Error,
    Cancelled,
    #[serde(other)]
    Other,
}

/// Visual style of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Success,
    Secondary,
    Destructive,
    Outline,
}

impl BadgeVariant {
    /// CSS class suffix used by templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Secondary => "secondary",
            Self::Destructive => "destructive",
            Self::Outline => "outline",
        }
    }
}

impl FulfillmentStatus {
    /// Badge shown next to a fulfillment.
    ///
    /// Pending and open fulfillments are distinguished from failed ones.
    #[must_use]
    pub const fn badge(self) -> BadgeVariant {
        match self {
            Self::Success => BadgeVariant::Success,
            Self::Pending | Self::Open => BadgeVariant::Secondary,
            Self::Failure | Self::Error | Self::Cancelled => BadgeVariant::Destructive,
            Self::Other => BadgeVariant::Outline,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Delivered",
            Self::Pending => "Pending",
            Self::Open => "Open",
            Self::Failure => "Failed",
            Self::Error => "Error",
            Self::Cancelled => "Cancelled",
            Self::Other => "Unknown",
        }
    }
}

/// Order financial status (Customer Account API `OrderFinancialStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    Expired,
    #[serde(other)]
    Other,
}

impl FinancialStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Payment pending",
            Self::Authorized => "Authorized",
            Self::PartiallyPaid => "Partially paid",
            Self::Paid => "Paid",
            Self::PartiallyRefunded => "Partially refunded",
            Self::Refunded => "Refunded",
            Self::Voided => "Voided",
            Self::Expired => "Expired",
            Self::Other => "Unknown",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_distinguishes_pending_from_failed() {
        assert_eq!(FulfillmentStatus::Success.badge(), BadgeVariant::Success);
        assert_eq!(FulfillmentStatus::Pending.badge(), BadgeVariant::Secondary);
        assert_eq!(FulfillmentStatus::Open.badge(), BadgeVariant::Secondary);
        assert_eq!(FulfillmentStatus::Failure.badge(), BadgeVariant::Destructive);
        assert_eq!(FulfillmentStatus::Error.badge(), BadgeVariant::Destructive);
        assert_eq!(
            FulfillmentStatus::Cancelled.badge(),
            BadgeVariant::Destructive
        );
        assert_eq!(FulfillmentStatus::Other.badge(), BadgeVariant::Outline);
    }

    #[test]
    fn test_unknown_status_deserializes_to_other() {
        let status: FulfillmentStatus = serde_json::from_str("\"IN_TRANSIT\"").unwrap();
        assert_eq!(status, FulfillmentStatus::Other);

        let status: FulfillmentStatus = serde_json::from_str("\"SUCCESS\"").unwrap();
        assert_eq!(status, FulfillmentStatus::Success);
    }

    #[test]
    fn test_financial_status_deserialize() {
        let status: FinancialStatus = serde_json::from_str("\"PARTIALLY_REFUNDED\"").unwrap();
        assert_eq!(status, FinancialStatus::PartiallyRefunded);
        assert_eq!(status.label(), "Partially refunded");
    }
}
