//! Shopify Customer Account API client.
//!
//! The Customer Account API provides access to customer authentication and
//! order history. Uses OAuth 2.0 for authentication.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect customer to Shopify's login page
//! 3. Shopify redirects back with authorization code
//! 4. Exchange code for tokens with `exchange_code()`
//! 5. Use access token for customer-scoped API calls
//!
//! # Example
//!
//! ```rust,ignore
//! use saffron_storefront::shopify::CustomerClient;
//!
//! let client = CustomerClient::new(&config.shopify);
//! let auth_url = client.authorization_url("https://example.com/auth/callback", &state, &nonce);
//!
//! // After OAuth callback, exchange code for token
//! let token = client.exchange_code(&code, "https://example.com/auth/callback").await?;
//! let orders = client.get_orders(&token.access_token, &PageRequest::First, OrderSortKey::ProcessedAt, true, None).await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use graphql_client::{QueryBody, Response};
use saffron_core::connection::{Connection, PageRequest};
use saffron_core::sort::OrderSortKey;
use saffron_core::OrderGid;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{ShopifyError, into_data};

/// Orders per history page.
pub const ORDERS_PAGE_SIZE: u32 = 10;

/// Line items or fulfillments fetched per expansion.
pub const NESTED_PAGE_SIZE: u32 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// GraphQL documents
// ─────────────────────────────────────────────────────────────────────────────

const CUSTOMER_QUERY: &str = r"
    query Customer {
        customer {
            id
            firstName
            lastName
            emailAddress { emailAddress }
        }
    }
";

const ORDERS_QUERY: &str = r"
    query CustomerOrders(
        $first: Int, $after: String, $last: Int, $before: String,
        $sortKey: OrderSortKeys, $reverse: Boolean, $query: String
    ) {
        customer {
            orders(
                first: $first, after: $after, last: $last, before: $before,
                sortKey: $sortKey, reverse: $reverse, query: $query
            ) {
                edges {
                    cursor
                    node {
                        id
                        name
                        number
                        processedAt
                        financialStatus
                        totalPrice { amount currencyCode }
                    }
                }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }
    }
";

const LINE_ITEMS_QUERY: &str = r"
    query OrderLineItems($orderId: ID!, $first: Int!, $after: String) {
        order(id: $orderId) {
            lineItems(first: $first, after: $after) {
                edges {
                    cursor
                    node {
                        id
                        title
                        variantTitle
                        quantity
                        price { amount currencyCode }
                        image { url altText }
                    }
                }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }
    }
";

const FULFILLMENTS_QUERY: &str = r"
    query OrderFulfillments($orderId: ID!, $first: Int!, $after: String) {
        order(id: $orderId) {
            fulfillments(first: $first, after: $after) {
                edges {
                    cursor
                    node {
                        id
                        status
                        createdAt
                        estimatedDeliveryAt
                        trackingInformation { company number url }
                    }
                }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }
    }
";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NestedPageVariables<'a> {
    order_id: &'a str,
    first: u32,
    after: Option<&'a str>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Customer Account Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the Shopify Customer Account API.
#[derive(Clone)]
pub struct CustomerClient {
    inner: Arc<CustomerClientInner>,
}

struct CustomerClientInner {
    client: reqwest::Client,
    origin: String,
    shop_id: String,
    api_version: String,
    client_id: String,
    client_secret: String,
}

impl CustomerClient {
    /// Create a new Customer Account API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self {
            inner: Arc::new(CustomerClientInner {
                client: reqwest::Client::new(),
                origin: config
                    .customer_account_origin
                    .trim_end_matches('/')
                    .to_string(),
                shop_id: config.customer_shop_id.clone(),
                api_version: config.api_version.clone(),
                client_id: config.customer_client_id.clone(),
                client_secret: config.customer_client_secret.expose_secret().to_string(),
            }),
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/auth/oauth/{endpoint}",
            self.inner.origin, self.inner.shop_id
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // OAuth Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate the authorization URL for customer login.
    ///
    /// `state` guards against CSRF and `nonce` against ID token replay; both
    /// are stored in the session until the callback.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}\
            &scope=openid%20email%20customer-account-api:full&state={}&nonce={}",
            self.auth_url("authorize"),
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
            urlencoding::encode(nonce)
        )
    }

    /// Generate the logout URL.
    #[must_use]
    pub fn logout_url(&self, id_token: &str, post_logout_redirect_uri: &str) -> String {
        format!(
            "{}?id_token_hint={}&post_logout_redirect_uri={}",
            self.auth_url("logout"),
            urlencoding::encode(id_token),
            urlencoding::encode(post_logout_redirect_uri)
        )
    }

    /// Exchange an authorization code for access tokens.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::OAuth` if Shopify rejects the exchange.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        self.token_request(&params, "Token exchange failed").await
    }

    /// Refresh an access token using a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::OAuth` if Shopify rejects the refresh token.
    #[instrument(skip_all)]
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        self.token_request(&params, "Token refresh failed").await
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
        failure: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("token"))
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(body = %text.chars().take(200).collect::<String>(), "{failure}");
            return Err(ShopifyError::OAuth(format!("{failure}: {text}")));
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(token_response.into())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // GraphQL Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a GraphQL operation against the Customer Account API.
    async fn query<V: Serialize, T: DeserializeOwned>(
        &self,
        access_token: &str,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, ShopifyError> {
        let url = format!(
            "{}/{}/account/customer/api/{}/graphql",
            self.inner.origin, self.inner.shop_id, self.inner.api_version
        );

        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let response = self
            .inner
            .client
            .post(&url)
            .header("Authorization", access_token)
            .header("User-Agent", "SaffronLane/1.0")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ShopifyError::OAuth(format!(
                "Customer API request failed ({status}): {text}"
            )));
        }

        let response: Response<T> = response.json().await?;
        into_data(response)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Customer Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the current customer's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_customer(&self, access_token: &str) -> Result<Customer, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            customer: Customer,
        }

        let data: Data = self
            .query(access_token, "Customer", CUSTOMER_QUERY, serde_json::Map::new())
            .await?;
        Ok(data.customer)
    }

    /// Get one page of the customer's orders.
    ///
    /// `query` is passed to Shopify's order search syntax (e.g. `name:#1001`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, access_token))]
    pub async fn get_orders(
        &self,
        access_token: &str,
        page: &PageRequest,
        sort_key: OrderSortKey,
        reverse: bool,
        query: Option<&str>,
    ) -> Result<Connection<Order>, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            first: Option<u32>,
            after: Option<&'a str>,
            last: Option<u32>,
            before: Option<&'a str>,
            sort_key: &'static str,
            reverse: bool,
            query: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct CustomerOrders {
            orders: Connection<Order>,
        }

        #[derive(Deserialize)]
        struct Data {
            customer: CustomerOrders,
        }

        let (first, after, last, before) = page.arguments(ORDERS_PAGE_SIZE);
        let data: Data = self
            .query(
                access_token,
                "CustomerOrders",
                ORDERS_QUERY,
                Variables {
                    first,
                    after,
                    last,
                    before,
                    sort_key: sort_key.as_graphql(),
                    reverse,
                    query,
                },
            )
            .await?;

        Ok(data.customer.orders)
    }

    /// Get the next page of an order's line items.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the order does not belong to the
    /// customer, or any API error.
    #[instrument(skip(self, access_token), fields(order_id = %order_id.as_str()))]
    pub async fn get_order_line_items(
        &self,
        access_token: &str,
        order_id: &OrderGid,
        after: Option<&str>,
    ) -> Result<Connection<LineItem>, ShopifyError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct OrderLineItems {
            line_items: Connection<LineItem>,
        }

        #[derive(Deserialize)]
        struct Data {
            order: Option<OrderLineItems>,
        }

        let data: Data = self
            .query(
                access_token,
                "OrderLineItems",
                LINE_ITEMS_QUERY,
                NestedPageVariables {
                    order_id: order_id.as_str(),
                    first: NESTED_PAGE_SIZE,
                    after,
                },
            )
            .await?;

        data.order
            .map(|order| order.line_items)
            .ok_or_else(|| ShopifyError::NotFound(format!("Order not found: {order_id}")))
    }

    /// Get the next page of an order's fulfillments.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the order does not belong to the
    /// customer, or any API error.
    #[instrument(skip(self, access_token), fields(order_id = %order_id.as_str()))]
    pub async fn get_order_fulfillments(
        &self,
        access_token: &str,
        order_id: &OrderGid,
        after: Option<&str>,
    ) -> Result<Connection<Fulfillment>, ShopifyError> {
        #[derive(Deserialize)]
        struct OrderFulfillments {
            fulfillments: Connection<Fulfillment>,
        }

        #[derive(Deserialize)]
        struct Data {
            order: Option<OrderFulfillments>,
        }

        let data: Data = self
            .query(
                access_token,
                "OrderFulfillments",
                FULFILLMENTS_QUERY,
                NestedPageVariables {
                    order_id: order_id.as_str(),
                    first: NESTED_PAGE_SIZE,
                    after,
                },
            )
            .await?;

        data.order
            .map(|order| order.fulfillments)
            .ok_or_else(|| ShopifyError::NotFound(format!("Order not found: {order_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CUSTOMER_ACCOUNT_ORIGIN;
    use secrecy::SecretString;

    fn client() -> CustomerClient {
        CustomerClient::new(&ShopifyStorefrontConfig {
            store: "saffron-lane.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_public_token: "public".to_string(),
            storefront_private_token: SecretString::from("private"),
            storefront_endpoint: None,
            customer_shop_id: "123456".to_string(),
            customer_client_id: "client id".to_string(),
            customer_client_secret: SecretString::from("secret"),
            customer_account_origin: format!("{DEFAULT_CUSTOMER_ACCOUNT_ORIGIN}/"),
        })
    }

    #[test]
    fn test_authorization_url_is_encoded() {
        let url = client().authorization_url("https://example.com/auth/callback", "st", "no");
        assert!(url.starts_with("https://shopify.com/123456/auth/oauth/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fauth%2Fcallback"));
        assert!(url.contains("state=st&nonce=no"));
    }

    #[test]
    fn test_logout_url() {
        let url = client().logout_url("idt", "https://example.com/");
        assert_eq!(
            url,
            "https://shopify.com/123456/auth/oauth/logout?id_token_hint=idt&post_logout_redirect_uri=https%3A%2F%2Fexample.com%2F"
        );
    }
}
