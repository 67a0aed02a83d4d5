//! Supported storefront countries.
//!
//! Every storefront URL carries a country segment (`/us/...`, `/in/...`).
//! The segment selects prices (`@inContext(country:)`), the currency shown
//! next to them, and which seasonal themes apply.

use serde::{Deserialize, Serialize};

/// A country the storefront sells into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Country {
    /// URL segment (lowercase).
    pub slug: &'static str,
    /// ISO 3166-1 alpha-2 code (uppercase), as used by Shopify `CountryCode`.
    pub code: &'static str,
    /// Display name, also written to the `country_name` cookie.
    pub name: &'static str,
    /// ISO 4217 currency code prices are presented in.
    pub currency: &'static str,
    /// Shopify `LanguageCode`.
    pub language: &'static str,
}

/// All supported countries. The first entry is the fallback default.
pub const COUNTRIES: &[Country] = &[
    Country {
        slug: "us",
        code: "US",
        name: "United States",
        currency: "USD",
        language: "EN",
    },
    Country {
        slug: "in",
        code: "IN",
        name: "India",
        currency: "INR",
        language: "EN",
    },
    Country {
        slug: "gb",
        code: "GB",
        name: "United Kingdom",
        currency: "GBP",
        language: "EN",
    },
    Country {
        slug: "ca",
        code: "CA",
        name: "Canada",
        currency: "CAD",
        language: "EN",
    },
    Country {
        slug: "au",
        code: "AU",
        name: "Australia",
        currency: "AUD",
        language: "EN",
    },
    Country {
        slug: "ae",
        code: "AE",
        name: "United Arab Emirates",
        currency: "AED",
        language: "EN",
    },
    Country {
        slug: "sg",
        code: "SG",
        name: "Singapore",
        currency: "SGD",
        language: "EN",
    },
    Country {
        slug: "de",
        code: "DE",
        name: "Germany",
        currency: "EUR",
        language: "EN",
    },
    Country {
        slug: "jp",
        code: "JP",
        name: "Japan",
        currency: "JPY",
        language: "EN",
    },
];

impl Country {
    /// Look up a country by URL segment (case-insensitive).
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        COUNTRIES
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(slug))
            .copied()
    }

    /// Look up a country by ISO code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        COUNTRIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .copied()
    }

    /// Prefix a site-relative path with this country's segment.
    ///
    /// `"/products/tea"` becomes `"/us/products/tea"`; `"/"` becomes `"/us"`.
    #[must_use]
    pub fn path(&self, path: &str) -> String {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            format!("/{}", self.slug)
        } else {
            format!("/{}/{trimmed}", self.slug)
        }
    }
}

impl Default for Country {
    fn default() -> Self {
        // COUNTRIES is a non-empty constant
        COUNTRIES.first().copied().unwrap_or(Self {
            slug: "us",
            code: "US",
            name: "United States",
            currency: "USD",
            language: "EN",
        })
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Countries serialize as their slug.
impl Serialize for Country {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug)
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slug = String::deserialize(deserializer)?;
        Self::from_slug(&slug)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown country: {slug}")))
    }
}
