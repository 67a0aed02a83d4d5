//! `sitemap.xml` generation against a mocked catalog.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::{StatusCode, header};
use common::{TestApp, body_string, get};
use saffron_core::COUNTRIES;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn handles(entries: &[(&str, Option<&str>)], next: Option<&str>) -> Value {
    let edges: Vec<Value> = entries
        .iter()
        .map(|(handle, updated_at)| json!({ "node": { "handle": handle, "updatedAt": updated_at } }))
        .collect();
    json!({
        "entries": {
            "edges": edges,
            "pageInfo": {
                "hasNextPage": next.is_some(),
                "hasPreviousPage": false,
                "endCursor": next
            }
        }
    })
}

/// Answer one page of a sitemap operation, matched by its `after` cursor.
async fn mock_page(app: &TestApp, operation: &str, after: Option<&str>, data: Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": operation,
            "variables": { "after": after }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .expect(1)
        .mount(&app.shopify)
        .await;
}

#[tokio::test]
async fn test_sitemap_lists_catalog_for_every_country() {
    let app = TestApp::new().await;
    app.mock_storefront(
        "SitemapProducts",
        handles(
            &[
                ("kashmiri-saffron", Some("2026-09-01T08:00:00Z")),
                ("masala-chai", Some("2026-08-12T10:30:00Z")),
            ],
            None,
        ),
    )
    .await;
    app.mock_storefront("SitemapCollections", handles(&[("teas", None)], None))
        .await;

    let response = app.send(get("/sitemap.xml")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    let xml = body_string(response).await;
    assert!(xml.contains(
        "<loc>http://localhost:3000/in/products/masala-chai</loc><lastmod>2026-08-12</lastmod>"
    ));
    assert!(xml.contains("<loc>http://localhost:3000/us/collections/teas</loc>"));
    // Three static pages, two products and one collection per country
    assert_eq!(xml.matches("<url>").count(), COUNTRIES.len() * 6);
}

#[tokio::test]
async fn test_sitemap_follows_every_page() {
    let app = TestApp::new().await;
    mock_page(
        &app,
        "SitemapProducts",
        None,
        handles(&[("kashmiri-saffron", None)], Some("p1")),
    )
    .await;
    mock_page(
        &app,
        "SitemapProducts",
        Some("p1"),
        handles(&[("masala-chai", None)], None),
    )
    .await;
    mock_page(
        &app,
        "SitemapCollections",
        None,
        handles(&[("teas", None)], Some("c1")),
    )
    .await;
    mock_page(
        &app,
        "SitemapCollections",
        Some("c1"),
        handles(&[("gift-boxes", None)], None),
    )
    .await;

    let response = app.send(get("/sitemap.xml")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let xml = body_string(response).await;
    assert!(xml.contains("<loc>http://localhost:3000/gb/products/masala-chai</loc>"));
    assert!(xml.contains("<loc>http://localhost:3000/gb/collections/gift-boxes</loc>"));
    assert_eq!(xml.matches("<url>").count(), COUNTRIES.len() * 7);
}

#[tokio::test]
async fn test_sitemap_fails_when_catalog_unavailable() {
    let app = TestApp::new().await;

    let response = app.send(get("/sitemap.xml")).await;

    assert!(response.status().is_server_error());
}
