//! Shared harness for storefront integration tests.
//!
//! Each test builds a fresh [`TestApp`]: the full router with in-memory
//! sessions, pointed at a `wiremock` server standing in for both Shopify APIs.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use saffron_core::Country;
use saffron_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use saffron_storefront::middleware::create_session_layer;
use saffron_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 32 bytes of `0x07`, base64 encoded.
pub const CART_KEY: &str = "BwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwc=";

pub const SHOP_ID: &str = "71234567";

/// Client address sent on every request so the rate limiter can key it.
const CLIENT_IP: &str = "203.0.113.7";

pub fn test_config(shopify_uri: &str) -> StorefrontConfig {
    StorefrontConfig {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("integration-test-session-secret-0123456789"),
        cart_key: SecretString::from(CART_KEY),
        default_country: Country::default(),
        shopify: ShopifyStorefrontConfig {
            store: "saffron-lane-test.myshopify.com".to_string(),
            api_version: "2025-07".to_string(),
            storefront_public_token: "public-token".to_string(),
            storefront_private_token: SecretString::from("private-token"),
            storefront_endpoint: Some(format!("{shopify_uri}/graphql")),
            customer_shop_id: SHOP_ID.to_string(),
            customer_client_id: "shp_test_client".to_string(),
            customer_client_secret: SecretString::from("client-secret"),
            customer_account_origin: shopify_uri.to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

pub struct TestApp {
    pub router: Router,
    pub shopify: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let shopify = MockServer::start().await;
        let config = test_config(&shopify.uri());
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, None).expect("test cart key is valid");
        let router = saffron_storefront::app(state, session_layer);
        Self { router, shopify }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Mount a Storefront API response for one GraphQL operation.
    pub async fn mock_storefront(&self, operation: &str, data: Value) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(&self.shopify)
            .await;
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str, htmx: bool, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("hx-request", "true");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response has a Location header")
        .to_str()
        .unwrap()
}

/// `name=value` pairs from every `Set-Cookie` header.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::to_string)
        .collect()
}

/// The session cookie, ready for a `Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> String {
    set_cookies(response)
        .into_iter()
        .find(|cookie| cookie.starts_with("sl_session="))
        .expect("response sets the session cookie")
}

pub fn hx_trigger(response: &Response<Body>) -> Value {
    let raw = response
        .headers()
        .get("hx-trigger")
        .expect("response has an HX-Trigger header")
        .to_str()
        .unwrap();
    serde_json::from_str(raw).unwrap()
}

/// A cart with a single line, shaped like the Storefront API `Cart` object.
pub fn cart_json(quantity: u32, unit_price: &str) -> Value {
    json!({
        "id": "gid://shopify/Cart/c1-test",
        "checkoutUrl": "https://saffron-lane-test.myshopify.com/cart/c/c1-test",
        "totalQuantity": quantity,
        "cost": {
            "subtotalAmount": { "amount": unit_price, "currencyCode": "INR" },
            "totalAmount": { "amount": unit_price, "currencyCode": "INR" }
        },
        "lines": {
            "edges": [{
                "cursor": "line-cursor-1",
                "node": {
                    "id": "gid://shopify/CartLine/l1",
                    "quantity": quantity,
                    "cost": {
                        "amountPerQuantity": { "amount": unit_price, "currencyCode": "INR" },
                        "totalAmount": { "amount": unit_price, "currencyCode": "INR" }
                    },
                    "merchandise": {
                        "id": "gid://shopify/ProductVariant/11",
                        "title": "50 g tin",
                        "quantityAvailable": 8,
                        "image": null,
                        "product": { "handle": "kashmiri-saffron", "title": "Kashmiri Saffron" }
                    }
                }
            }],
            "pageInfo": { "hasNextPage": false, "hasPreviousPage": false }
        }
    })
}
