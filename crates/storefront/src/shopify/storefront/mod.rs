//! Shopify Storefront API client implementation.
//!
//! Documents live in [`queries`]; requests are sent with the
//! `graphql_client` envelope over `reqwest`. Catalog reads are cached with
//! `moka` (5-minute TTL), keyed per country.

mod cache;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use moka::future::Cache;
use saffron_core::connection::{Connection, PageRequest};
use saffron_core::sort::{ProductCollectionSortKey, SortConfig};
use saffron_core::{CartGid, CartLineGid, Country, ProductGid};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, HandleEntry, Menu, Product, ShopPolicy,
    StorefrontCustomer, StorefrontCustomerToken, VariantNode, VariantSummary,
};
use crate::shopify::{GraphQLError, ShopifyError, UserError, check_user_errors, into_data};

use cache::CacheValue;
use queries::Operation;

/// Products per catalog page.
pub const PAGE_SIZE: u32 = 24;

/// Collections fetched for the collection index.
const COLLECTIONS_PAGE_SIZE: u32 = 50;

/// Largest `ids` list `nodes(ids:)` accepts.
pub const MAX_NODE_IDS: usize = 250;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; all clones share one HTTP client and cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.storefront_url(),
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<V, T>(&self, operation: Operation, variables: V) -> Result<T, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = QueryBody {
            variables,
            query: operation.document,
            operation_name: operation.name,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = operation.name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            ))]));
        }

        let response: Response<T> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                operation = operation.name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        into_data(response)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle, priced for `country`.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no product has this handle, or
    /// any API error.
    #[instrument(skip(self, country), fields(handle = %handle, country = country.code))]
    pub async fn get_product(&self, handle: &str, country: &Country) -> Result<Product, ShopifyError> {
        let cache_key = cache::key("product", &[country.code, handle]);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        #[derive(Serialize)]
        struct Variables<'a> {
            handle: &'a str,
            country: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            product: Option<Product>,
        }

        let data: Data = self
            .execute(
                queries::PRODUCT_BY_HANDLE,
                Variables {
                    handle,
                    country: country.code,
                },
            )
            .await?;

        let product = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a page of products, optionally filtered by a search query.
    ///
    /// Search results are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, country), fields(country = country.code))]
    pub async fn get_products(
        &self,
        page: &PageRequest,
        query: Option<&str>,
        sort: SortConfig,
        country: &Country,
    ) -> Result<Connection<Product>, ShopifyError> {
        let (first, after, last, before) = page.arguments(PAGE_SIZE);
        let cache_key = cache::key(
            "products",
            &[
                country.code,
                after.unwrap_or(""),
                before.unwrap_or(""),
                sort_cache_part(sort),
            ],
        );

        if query.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            first: Option<u32>,
            after: Option<&'a str>,
            last: Option<u32>,
            before: Option<&'a str>,
            query: Option<&'a str>,
            sort_key: saffron_core::sort::ProductSortKey,
            reverse: bool,
            country: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            products: Connection<Product>,
        }

        let data: Data = self
            .execute(
                queries::PRODUCTS,
                Variables {
                    first,
                    after,
                    last,
                    before,
                    query,
                    sort_key: sort.key,
                    reverse: sort.reverse,
                    country: country.code,
                },
            )
            .await?;

        if query.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(data.products.clone()))
                .await;
        }

        Ok(data.products)
    }

    /// Get related products for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, country), fields(product_id = %product_id.as_str()))]
    pub async fn get_recommendations(
        &self,
        product_id: &ProductGid,
        country: &Country,
    ) -> Result<Vec<Product>, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            product_id: &'a str,
            country: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            product_recommendations: Option<Vec<Product>>,
        }

        let data: Data = self
            .execute(
                queries::PRODUCT_RECOMMENDATIONS,
                Variables {
                    product_id: product_id.as_str(),
                    country: country.code,
                },
            )
            .await?;

        Ok(data.product_recommendations.unwrap_or_default())
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get the collection index.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, country), fields(country = country.code))]
    pub async fn get_collections(
        &self,
        after: Option<&str>,
        country: &Country,
    ) -> Result<Connection<Collection>, ShopifyError> {
        let cache_key = cache::key("collections", &[country.code, after.unwrap_or("")]);

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        #[derive(Serialize)]
        struct Variables<'a> {
            first: u32,
            after: Option<&'a str>,
            country: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            collections: Connection<Collection>,
        }

        let data: Data = self
            .execute(
                queries::COLLECTIONS,
                Variables {
                    first: COLLECTIONS_PAGE_SIZE,
                    after,
                    country: country.code,
                },
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(data.collections.clone()))
            .await;

        Ok(data.collections)
    }

    /// Get a collection with one page of its products.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no collection has this handle, or
    /// any API error.
    #[instrument(skip(self, country), fields(handle = %handle, country = country.code))]
    pub async fn get_collection(
        &self,
        handle: &str,
        page: &PageRequest,
        sort: SortConfig,
        country: &Country,
    ) -> Result<Collection, ShopifyError> {
        let (first, after, last, before) = page.arguments(PAGE_SIZE);
        let cache_key = cache::key(
            "collection",
            &[
                country.code,
                handle,
                after.unwrap_or(""),
                before.unwrap_or(""),
                sort_cache_part(sort),
            ],
        );

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            handle: &'a str,
            first: Option<u32>,
            after: Option<&'a str>,
            last: Option<u32>,
            before: Option<&'a str>,
            sort_key: ProductCollectionSortKey,
            reverse: bool,
            country: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            collection: Option<Collection>,
        }

        let data: Data = self
            .execute(
                queries::COLLECTION_BY_HANDLE,
                Variables {
                    handle,
                    first,
                    after,
                    last,
                    before,
                    sort_key: sort.key.into(),
                    reverse: sort.reverse,
                    country: country.code,
                },
            )
            .await?;

        let collection = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    // =========================================================================
    // Wishlist lookups
    // =========================================================================

    /// Resolve variant IDs to variant summaries, dropping unknown IDs.
    ///
    /// IDs are sent in batches of [`MAX_NODE_IDS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ids, country), fields(count = ids.len()))]
    pub async fn get_variants(
        &self,
        ids: &[String],
        country: &Country,
    ) -> Result<Vec<VariantSummary>, ShopifyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(Serialize)]
        struct Variables<'a> {
            ids: &'a [String],
            country: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            nodes: Vec<Option<VariantNode>>,
        }

        let mut variants = Vec::with_capacity(ids.len());
        for batch in ids.chunks(MAX_NODE_IDS) {
            let data: Data = self
                .execute(
                    queries::VARIANT_NODES,
                    Variables {
                        ids: batch,
                        country: country.code,
                    },
                )
                .await?;

            variants.extend(data.nodes.into_iter().flatten().filter_map(
                |node| match node {
                    VariantNode::ProductVariant(variant) => Some(variant),
                    VariantNode::Other => None,
                },
            ));
        }

        Ok(variants)
    }

    // =========================================================================
    // Navigation and content
    // =========================================================================

    /// Get a navigation menu by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the menu does not exist, or any
    /// API error.
    #[instrument(skip(self))]
    pub async fn get_menu(&self, handle: &str) -> Result<Menu, ShopifyError> {
        let cache_key = cache::key("menu", &[handle]);

        if let Some(CacheValue::Menu(menu)) = self.inner.cache.get(&cache_key).await {
            return Ok(menu);
        }

        #[derive(Serialize)]
        struct Variables<'a> {
            handle: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            menu: Option<Menu>,
        }

        let data: Data = self.execute(queries::MENU, Variables { handle }).await?;
        let menu = data
            .menu
            .ok_or_else(|| ShopifyError::NotFound(format!("Menu not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Menu(menu.clone()))
            .await;

        Ok(menu)
    }

    /// Get the shop's published legal policies.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_policies(&self) -> Result<Vec<ShopPolicy>, ShopifyError> {
        let cache_key = cache::key("policies", &[]);

        if let Some(CacheValue::Policies(policies)) = self.inner.cache.get(&cache_key).await {
            return Ok(policies);
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Shop {
            privacy_policy: Option<ShopPolicy>,
            refund_policy: Option<ShopPolicy>,
            shipping_policy: Option<ShopPolicy>,
            terms_of_service: Option<ShopPolicy>,
        }

        #[derive(Deserialize)]
        struct Data {
            shop: Shop,
        }

        let data: Data = self
            .execute(queries::SHOP_POLICIES, serde_json::Map::new())
            .await?;
        let Shop {
            privacy_policy,
            refund_policy,
            shipping_policy,
            terms_of_service,
        } = data.shop;
        let policies: Vec<ShopPolicy> = [
            privacy_policy,
            refund_policy,
            shipping_policy,
            terms_of_service,
        ]
        .into_iter()
        .flatten()
        .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Policies(policies.clone()))
            .await;

        Ok(policies)
    }

    /// Every product and collection handle.
    ///
    /// # Errors
    ///
    /// Returns an error if any API request fails.
    #[instrument(skip(self))]
    pub async fn get_sitemap_entries(
        &self,
    ) -> Result<(Vec<HandleEntry>, Vec<HandleEntry>), ShopifyError> {
        let products = self.all_handles(queries::SITEMAP_PRODUCTS).await?;
        let collections = self.all_handles(queries::SITEMAP_COLLECTIONS).await?;
        Ok((products, collections))
    }

    /// Follow `operation`'s `entries` connection to the last page.
    async fn all_handles(&self, operation: Operation) -> Result<Vec<HandleEntry>, ShopifyError> {
        #[derive(Serialize)]
        struct Variables {
            after: Option<String>,
        }

        #[derive(Deserialize)]
        struct Data {
            entries: Connection<HandleEntry>,
        }

        let mut after = None;
        let mut all: Option<Connection<HandleEntry>> = None;

        loop {
            let data: Data = self.execute(operation, Variables { after }).await?;

            let next = data.entries;
            after = next
                .page_info
                .has_next_page
                .then(|| next.page_info.end_cursor.clone())
                .flatten();

            match all.as_mut() {
                Some(all) => all.splice(next),
                None => all = Some(next),
            }

            if after.is_none() {
                break;
            }
        }

        Ok(all.unwrap_or_default().into_nodes())
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a cart for a country, optionally with initial lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, lines, country), fields(country = country.code))]
    pub async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct BuyerIdentity<'a> {
            country_code: &'a str,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct CartInput<'a> {
            lines: Vec<CartLineInput>,
            buyer_identity: BuyerIdentity<'a>,
        }

        #[derive(Serialize)]
        struct Variables<'a> {
            input: CartInput<'a>,
            country: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_create: CartPayload,
        }

        let data: Data = self
            .execute(
                queries::CART_CREATE,
                Variables {
                    input: CartInput {
                        lines,
                        buyer_identity: BuyerIdentity {
                            country_code: country.code,
                        },
                    },
                    country: country.code,
                },
            )
            .await?;

        data.cart_create.into_cart()
    }

    /// Fetch a cart. `None` when the cart no longer exists (expired or
    /// completed).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, country), fields(cart_id = %cart_id.as_str()))]
    pub async fn get_cart(
        &self,
        cart_id: &CartGid,
        country: &Country,
    ) -> Result<Option<Cart>, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            cart: Option<Cart>,
        }

        let data: Data = self
            .execute(
                queries::CART,
                CartVariables {
                    cart_id: cart_id.as_str(),
                    country: country.code,
                },
            )
            .await?;

        Ok(data.cart)
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, lines, country), fields(cart_id = %cart_id.as_str()))]
    pub async fn add_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineInput>,
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            cart_id: &'a str,
            lines: Vec<CartLineInput>,
            country: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_lines_add: CartPayload,
        }

        let data: Data = self
            .execute(
                queries::CART_LINES_ADD,
                Variables {
                    cart_id: cart_id.as_str(),
                    lines,
                    country: country.code,
                },
            )
            .await?;

        data.cart_lines_add.into_cart()
    }

    /// Change line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, lines, country), fields(cart_id = %cart_id.as_str()))]
    pub async fn update_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineUpdateInput>,
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            cart_id: &'a str,
            lines: Vec<CartLineUpdateInput>,
            country: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_lines_update: CartPayload,
        }

        let data: Data = self
            .execute(
                queries::CART_LINES_UPDATE,
                Variables {
                    cart_id: cart_id.as_str(),
                    lines,
                    country: country.code,
                },
            )
            .await?;

        data.cart_lines_update.into_cart()
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, line_ids, country), fields(cart_id = %cart_id.as_str()))]
    pub async fn remove_lines(
        &self,
        cart_id: &CartGid,
        line_ids: &[CartLineGid],
        country: &Country,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            cart_id: &'a str,
            line_ids: Vec<&'a str>,
            country: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_lines_remove: CartPayload,
        }

        let data: Data = self
            .execute(
                queries::CART_LINES_REMOVE,
                Variables {
                    cart_id: cart_id.as_str(),
                    line_ids: line_ids.iter().map(CartLineGid::as_str).collect(),
                    country: country.code,
                },
            )
            .await?;

        data.cart_lines_remove.into_cart()
    }

    // =========================================================================
    // Classic customer accounts
    // =========================================================================

    /// Exchange email and password for a customer access token.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` for rejected credentials, or any
    /// API error.
    #[instrument(skip(self, email, password))]
    pub async fn create_customer_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<StorefrontCustomerToken, ShopifyError> {
        #[derive(Serialize)]
        struct Input<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Serialize)]
        struct Variables<'a> {
            input: Input<'a>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            customer_access_token: Option<StorefrontCustomerToken>,
            #[serde(default)]
            customer_user_errors: Vec<UserError>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            customer_access_token_create: Payload,
        }

        let data: Data = self
            .execute(
                queries::CUSTOMER_ACCESS_TOKEN_CREATE,
                Variables {
                    input: Input { email, password },
                },
            )
            .await?;

        let payload = data.customer_access_token_create;
        check_user_errors(payload.customer_user_errors)?;
        payload
            .customer_access_token
            .ok_or_else(|| ShopifyError::NotFound("customer access token".to_string()))
    }

    /// Look up the customer a classic access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Unauthorized` if the token is invalid or
    /// expired, or any API error.
    #[instrument(skip(self, token))]
    pub async fn get_customer_by_token(
        &self,
        token: &str,
    ) -> Result<StorefrontCustomer, ShopifyError> {
        #[derive(Serialize)]
        struct Variables<'a> {
            token: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            customer: Option<StorefrontCustomer>,
        }

        let data: Data = self
            .execute(queries::CUSTOMER_BY_TOKEN, Variables { token })
            .await?;

        data.customer.ok_or(ShopifyError::Unauthorized)
    }

    /// Revoke a classic access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_customer_token(&self, token: &str) -> Result<(), ShopifyError> {
        #[derive(Serialize)]
        struct Variables<'a> {
            token: &'a str,
        }

        let _: serde_json::Value = self
            .execute(queries::CUSTOMER_ACCESS_TOKEN_DELETE, Variables { token })
            .await?;

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartVariables<'a> {
    cart_id: &'a str,
    country: &'a str,
}

/// Payload shared by every cart mutation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartPayload {
    cart: Option<Cart>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

impl CartPayload {
    fn into_cart(self) -> Result<Cart, ShopifyError> {
        check_user_errors(self.user_errors)?;
        self.cart
            .ok_or_else(|| ShopifyError::NotFound("cart missing from mutation payload".to_string()))
    }
}

const fn sort_cache_part(sort: SortConfig) -> &'static str {
    use saffron_core::sort::ProductSortKey;

    match (sort.key, sort.reverse) {
        (ProductSortKey::Relevance, _) => "relevance",
        (ProductSortKey::BestSelling, _) => "best-selling",
        (ProductSortKey::CreatedAt, false) => "created",
        (ProductSortKey::CreatedAt, true) => "created-desc",
        (ProductSortKey::Price, false) => "price",
        (ProductSortKey::Price, true) => "price-desc",
        (ProductSortKey::Title, false) => "title",
        (ProductSortKey::Title, true) => "title-desc",
    }
}
