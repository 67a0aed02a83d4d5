//! Country segment resolution through the full router.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{TestApp, body_string, get, get_with_cookie, location, set_cookies};

#[tokio::test]
async fn test_root_redirects_to_geo_country() {
    let app = TestApp::new().await;
    let mut request = get("/");
    request
        .headers_mut()
        .insert("cf-ipcountry", "IN".parse().unwrap());

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/in");
    let cookies = set_cookies(&response);
    assert!(cookies.contains(&"country=in".to_string()));
    assert!(cookies.iter().any(|c| c.starts_with("country_name=")));
}

#[tokio::test]
async fn test_cookie_beats_geo_header() {
    let app = TestApp::new().await;
    let mut request = get_with_cookie("/products/kashmiri-saffron", "country=gb");
    request
        .headers_mut()
        .insert("cf-ipcountry", "IN".parse().unwrap());

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/gb/products/kashmiri-saffron");
}

#[tokio::test]
async fn test_unknown_segment_is_replaced_keeping_query() {
    let app = TestApp::new().await;

    let response = app.send(get("/zz/search?q=tea")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/us/search?q=tea");
}

#[tokio::test]
async fn test_health_is_not_localized() {
    let app = TestApp::new().await;

    let response = app.send(get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_without_database() {
    let app = TestApp::new().await;

    let response = app.send(get("/health/ready")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_robots_is_not_localized() {
    let app = TestApp::new().await;

    let response = app.send(get("/robots.txt")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Disallow: /account"));
    assert!(body.contains("Sitemap: http://localhost:3000/sitemap.xml"));
}

#[tokio::test]
async fn test_country_page_renders_and_sets_cookie() {
    let app = TestApp::new().await;

    // Shopify is not mocked: the menu falls back and an empty search makes no call
    let response = app.send(get("/in/search")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).contains(&"country=in".to_string()));
    let csp = response
        .headers()
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(csp.contains("nonce-"));

    let body = body_string(response).await;
    assert!(body.contains("/in/collections"));
    assert!(body.contains("India"));
}

#[tokio::test]
async fn test_matching_cookie_is_not_rewritten() {
    let app = TestApp::new().await;

    let response = app.send(get_with_cookie("/gb/search", "country=gb")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!set_cookies(&response).iter().any(|c| c.starts_with("country=")));
}
