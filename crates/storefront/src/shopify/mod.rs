//! Shopify Storefront and Customer Account API clients.
//!
//! # Architecture
//!
//! - Queries are GraphQL documents kept next to each client; `graphql_client`
//!   supplies the request envelope and the response/error types
//! - Shopify is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Every Storefront query runs `@inContext(country:)` so prices come back
//!   in the visitor's currency
//!
//! # APIs
//!
//! ## Storefront API
//! - Products, collections, search, menus, policies, cart operations
//! - Credentials login (`customerAccessTokenCreate`)
//!
//! ## Customer Account API
//! - OAuth authentication flow
//! - Customer data, paginated order history

pub mod customer;
pub mod storefront;
pub mod types;

pub use customer::{CustomerAccessToken, CustomerClient};
pub use storefront::StorefrontClient;
pub use types::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Mutation rejected the input.
    #[error("User error: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),

    /// OAuth token exchange or Customer Account request failed.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Access token rejected (expired or revoked).
    #[error("Unauthorized")]
    Unauthorized,
}

impl ShopifyError {
    /// The first machine-readable user error code, if any.
    #[must_use]
    pub fn user_error_code(&self) -> Option<&str> {
        match self {
            Self::UserErrors(errors) => errors.iter().find_map(|e| e.code.as_deref()),
            _ => None,
        }
    }
}

/// A `userErrors` / `customerUserErrors` entry from a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Input path the error refers to.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
    /// Error code (e.g. `UNIDENTIFIED_CUSTOMER`).
    #[serde(default)]
    pub code: Option<String>,
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error.locations.map_or_else(Vec::new, |locations| {
                locations
                    .into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: error.path.map_or_else(Vec::new, |path| {
                path.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(key) => serde_json::Value::String(key),
                        graphql_client::PathFragment::Index(index) => {
                            serde_json::Value::Number(index.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

/// Unwrap a `graphql_client` response into its data.
///
/// # Errors
///
/// Returns `ShopifyError::GraphQL` when the response carries errors or no data.
pub fn into_data<T>(response: graphql_client::Response<T>) -> Result<T, ShopifyError> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(GraphQLError::from).collect(),
        ));
    }

    response
        .data
        .ok_or_else(|| ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
}

/// Turn a non-empty `userErrors` list into an error.
///
/// # Errors
///
/// Returns `ShopifyError::UserErrors` when `errors` is non-empty.
pub fn check_user_errors(errors: Vec<UserError>) -> Result<(), ShopifyError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ShopifyError::UserErrors(errors))
    }
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = ShopifyError::GraphQL(vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("cart".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: path: cart.0 at line 5:10");
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_into_data_converts_errors() {
        let response: graphql_client::Response<serde_json::Value> = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"Throttled","path":["products",2]}]}"#,
        )
        .unwrap();
        let err = into_data(response).unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Throttled path: products.2");
    }

    #[test]
    fn test_user_errors() {
        let errors: Vec<UserError> = serde_json::from_str(
            r#"[{"field":["input","email"],"message":"Unidentified customer","code":"UNIDENTIFIED_CUSTOMER"}]"#,
        )
        .unwrap();
        let err = check_user_errors(errors).unwrap_err();
        assert_eq!(err.user_error_code(), Some("UNIDENTIFIED_CUSTOMER"));
        assert_eq!(err.to_string(), "User error: Unidentified customer");
        assert!(check_user_errors(vec![]).is_ok());
    }
}
