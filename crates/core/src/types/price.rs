//! Currency symbols and money formatting.
//!
//! Shopify returns money as a decimal string plus an ISO 4217 code
//! (`{ amount: "12.5", currencyCode: "USD" }`). Amounts are parsed with
//! `rust_decimal` so formatting never goes through floating point.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Known currency symbols, keyed by ISO 4217 code.
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("INR", "₹"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("AED", "AED "),
    ("SGD", "S$"),
    ("JPY", "¥"),
    ("NZD", "NZ$"),
    ("CHF", "CHF "),
];

/// Currencies presented without minor units.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY"];

/// Symbol for a currency code.
///
/// Unknown codes (including the empty string) are echoed back unchanged so
/// the amount is still labelled with something meaningful.
#[must_use]
pub fn currency_symbol(code: &str) -> String {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(known, _)| *known == code)
        .map_or_else(|| code.to_string(), |(_, symbol)| (*symbol).to_string())
}

/// Format a decimal amount string with its currency symbol.
///
/// Amounts that fail to parse are shown verbatim after the symbol.
#[must_use]
pub fn format_money(amount: &str, currency_code: &str) -> String {
    let symbol = currency_symbol(currency_code);
    Decimal::from_str(amount.trim()).map_or_else(
        |_| format!("{symbol}{amount}"),
        |value| {
            let minor: u32 = if ZERO_DECIMAL_CURRENCIES.contains(&currency_code) {
                0
            } else {
                2
            };
            let rounded =
                value.round_dp_with_strategy(minor, RoundingStrategy::MidpointAwayFromZero);
            format!("{symbol}{rounded:.prec$}", prec = minor as usize)
        },
    )
}

/// A price with currency information.
///
/// Field names follow Shopify's `MoneyV2` (`amount`, `currencyCode`) so the
/// type deserializes straight from API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: String) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_money(&self.amount.to_string(), &self.currency_code)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols() {
        for (code, symbol) in CURRENCY_SYMBOLS {
            assert_eq!(currency_symbol(code), *symbol);
        }
    }

    #[test]
    fn test_unknown_code_is_echoed() {
        assert_eq!(currency_symbol("XYZ"), "XYZ");
        assert_eq!(currency_symbol(""), "");
        assert_eq!(currency_symbol("usd"), "usd");
    }

    #[test]
    fn test_format_money_two_decimals() {
        assert_eq!(format_money("12.5", "USD"), "$12.50");
        assert_eq!(format_money("1499", "INR"), "₹1499.00");
        assert_eq!(format_money("0.005", "EUR"), "€0.00");
    }

    #[test]
    fn test_format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money("0.025", "USD"), "$0.03");
        assert_eq!(format_money("10.125", "GBP"), "£10.13");
        assert_eq!(format_money("1500.5", "JPY"), "¥1501");
    }

    #[test]
    fn test_format_money_zero_decimal_currency() {
        assert_eq!(format_money("1200.0", "JPY"), "¥1200");
    }

    #[test]
    fn test_format_money_unparseable_amount() {
        assert_eq!(format_money("n/a", "GBP"), "£n/a");
    }

    #[test]
    fn test_price_from_money_v2() {
        let price: Price =
            serde_json::from_str(r#"{"amount":"24.0","currencyCode":"GBP"}"#).unwrap();
        assert_eq!(price.display(), "£24.00");
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(1999, 2), "CAD".to_string());
        assert_eq!(price.display(), "CA$19.99");
    }
}
