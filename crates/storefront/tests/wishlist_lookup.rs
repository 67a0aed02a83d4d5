//! Resolving large wishlists through batched `nodes(ids:)` lookups.

#![allow(clippy::unwrap_used)]

mod common;

use common::test_config;
use saffron_core::Country;
use saffron_core::wishlist::Wishlist;
use saffron_storefront::services::wishlist::resolve;
use saffron_storefront::shopify::StorefrontClient;
use saffron_storefront::shopify::storefront::MAX_NODE_IDS;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const GONE: u32 = 7;

fn variant_id(n: u32) -> String {
    format!("gid://shopify/ProductVariant/{n}")
}

/// Answers each batch in reverse order, with `null` for the retired variant.
fn answer_nodes(request: &Request) -> ResponseTemplate {
    let body: Value = request.body_json().unwrap();
    let ids = body["variables"]["ids"].as_array().unwrap();
    assert!(ids.len() <= MAX_NODE_IDS);

    let nodes: Vec<Value> = ids
        .iter()
        .rev()
        .map(|id| {
            let id = id.as_str().unwrap();
            if id == variant_id(GONE) {
                return Value::Null;
            }
            json!({
                "__typename": "ProductVariant",
                "id": id,
                "title": "100g",
                "availableForSale": true,
                "quantityAvailable": 5,
                "price": { "amount": "12.0", "currencyCode": "USD" },
                "image": null,
                "product": { "handle": "masala-chai", "title": "Masala Chai", "featuredImage": null }
            })
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(json!({ "data": { "nodes": nodes } }))
}

#[tokio::test]
async fn test_large_wishlist_resolves_in_batches_and_keeps_order() {
    let shopify = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": "VariantNodes" })))
        .respond_with(answer_nodes)
        .expect(2)
        .mount(&shopify)
        .await;

    let config = test_config(&shopify.uri());
    let storefront = StorefrontClient::new(&config.shopify);
    let wishlist = Wishlist::from_ids((1..=260).map(variant_id));

    let variants = resolve(&storefront, &wishlist, &Country::default())
        .await
        .unwrap();

    let expected: Vec<String> = (1..=260).filter(|n| *n != GONE).map(variant_id).collect();
    let resolved: Vec<&str> = variants.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(resolved, expected);
}

#[tokio::test]
async fn test_empty_wishlist_sends_no_request() {
    let shopify = MockServer::start().await;
    let config = test_config(&shopify.uri());
    let storefront = StorefrontClient::new(&config.shopify);

    let variants = resolve(&storefront, &Wishlist::new(), &Country::default())
        .await
        .unwrap();

    assert!(variants.is_empty());
    assert!(shopify.received_requests().await.unwrap().is_empty());
}
