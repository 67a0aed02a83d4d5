//! Types for Shopify Customer Account API OAuth and responses.

use chrono::{DateTime, Utc};
use saffron_core::connection::Connection;
use saffron_core::{FinancialStatus, FulfillmentStatus, OrderGid, Price};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// OAuth Types
// ─────────────────────────────────────────────────────────────────────────────

/// Customer access token obtained via OAuth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAccessToken {
    /// The access token for API requests.
    pub access_token: String,
    /// The ID token (`OpenID` Connect), needed for logout.
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    pub expires_in: Option<i64>,
    /// Unix timestamp when the token was obtained.
    pub obtained_at: i64,
}

impl CustomerAccessToken {
    /// Check if the access token is expired (with 60s buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Expiry check against an explicit clock.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_in.is_some_and(|expires_in| {
            let expires_at = self.obtained_at + expires_in;
            now >= (expires_at - 60)
        })
    }
}

/// Raw token response from Shopify OAuth endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl From<TokenResponse> for CustomerAccessToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Customer Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    pub email_address: Option<String>,
}

/// A customer as seen by the Customer Account API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<EmailAddress>,
}

impl Customer {
    /// Get the customer's display name, falling back to their email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email().unwrap_or("Customer").to_string()
        } else {
            name
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email_address
            .as_ref()
            .and_then(|e| e.email_address.as_deref())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Order Types
// ─────────────────────────────────────────────────────────────────────────────

/// Image attached to an order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A purchased line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub image: Option<LineItemImage>,
}

/// Carrier tracking for a fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInformation {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A shipment for part or all of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
    pub id: String,
    #[serde(default)]
    pub status: FulfillmentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub estimated_delivery_at: Option<String>,
    #[serde(default)]
    pub tracking_information: Vec<TrackingInformation>,
}

/// A customer order.
///
/// `line_items` and `fulfillments` are empty until expanded; each is
/// loaded page by page on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderGid,
    /// Display name (e.g., "#1001").
    pub name: String,
    pub number: i64,
    /// ISO 8601 timestamp.
    pub processed_at: String,
    #[serde(default)]
    pub financial_status: Option<FinancialStatus>,
    pub total_price: Price,
    #[serde(default)]
    pub line_items: Connection<LineItem>,
    #[serde(default)]
    pub fulfillments: Connection<Fulfillment>,
}

impl Order {
    /// Parse the processed date as a `DateTime`.
    #[must_use]
    pub fn processed_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.processed_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Processed date formatted for display (e.g., "Mar 4, 2026").
    #[must_use]
    pub fn processed_on(&self) -> String {
        self.processed_at_datetime().map_or_else(
            || self.processed_at.clone(),
            |dt| dt.format("%b %-d, %Y").to_string(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn token(expires_in: Option<i64>) -> CustomerAccessToken {
        CustomerAccessToken {
            access_token: "at".to_string(),
            id_token: None,
            refresh_token: Some("rt".to_string()),
            expires_in,
            obtained_at: 1_000,
        }
    }

    #[test]
    fn test_token_expiry_has_buffer() {
        let token = token(Some(3600));
        assert!(!token.is_expired_at(1_000 + 3600 - 61));
        assert!(token.is_expired_at(1_000 + 3600 - 60));
        assert!(!self::token(None).is_expired_at(i64::MAX));
    }

    #[test]
    fn test_order_deserializes_without_nested_pages() {
        let order: Order = serde_json::from_str(
            r##"{
                "id": "gid://shopify/Order/42",
                "name": "#1042",
                "number": 1042,
                "processedAt": "2026-03-04T10:00:00Z",
                "financialStatus": "PAID",
                "totalPrice": {"amount": "1299.0", "currencyCode": "INR"}
            }"##,
        )
        .unwrap();
        assert_eq!(order.id.legacy_id(), "42");
        assert_eq!(order.financial_status, Some(FinancialStatus::Paid));
        assert!(order.line_items.is_empty());
        assert_eq!(order.processed_on(), "Mar 4, 2026");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let customer: Customer = serde_json::from_str(
            r#"{"id":"gid://shopify/Customer/1","emailAddress":{"emailAddress":"a@b.co"}}"#,
        )
        .unwrap();
        assert_eq!(customer.display_name(), "a@b.co");
    }
}
