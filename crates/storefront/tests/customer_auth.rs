//! Sign-in flows and customer-only pages.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{
    SHOP_ID, TestApp, body_string, get, get_with_cookie, location, post_form, session_cookie,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn query_param(location: &str, name: &str) -> Option<String> {
    let (_, query) = location.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[tokio::test]
async fn test_account_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.send(get("/in/account")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?return_to=%2Fin%2Faccount");
}

#[tokio::test]
async fn test_customer_api_is_unauthorized_when_signed_out() {
    let app = TestApp::new().await;

    let response = app.send(get("/api/customer")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_page_shows_error_message() {
    let app = TestApp::new().await;

    let response = app
        .send(get("/auth/login?error=UNIDENTIFIED_CUSTOMER&return_to=%2Fgb%2Fcart"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Incorrect email or password."));
    assert!(body.contains("/auth/oauth?return_to=%2Fgb%2Fcart"));
}

#[tokio::test]
async fn test_password_login_then_orders_need_customer_account() {
    let app = TestApp::new().await;
    app.mock_storefront(
        "CustomerAccessTokenCreate",
        json!({
            "customerAccessTokenCreate": {
                "customerAccessToken": {
                    "accessToken": "classic-token",
                    "expiresAt": "2099-01-01T00:00:00Z"
                },
                "customerUserErrors": []
            }
        }),
    )
    .await;

    let response = app
        .send(post_form(
            "/auth/login",
            "email=asha%40example.com&password=masala&return_to=%2Fin%2Faccount%2Forders",
            false,
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/in/account/orders");
    let cookie = session_cookie(&response);

    // Order history is only served by the Customer Account API
    let response = app.send(get_with_cookie("/in/account/orders", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/auth/oauth?return_to=%2Fin%2Faccount%2Forders"
    );
}

#[tokio::test]
async fn test_rejected_password_redirects_with_code() {
    let app = TestApp::new().await;
    app.mock_storefront(
        "CustomerAccessTokenCreate",
        json!({
            "customerAccessTokenCreate": {
                "customerAccessToken": null,
                "customerUserErrors": [{
                    "code": "UNIDENTIFIED_CUSTOMER",
                    "field": ["input"],
                    "message": "Unidentified customer"
                }]
            }
        }),
    )
    .await;

    let response = app
        .send(post_form(
            "/auth/login",
            "email=asha%40example.com&password=wrong&return_to=%2Fin%2Faccount",
            false,
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/auth/login?error=UNIDENTIFIED_CUSTOMER&return_to=%2Fin%2Faccount"
    );
}

#[tokio::test]
async fn test_blank_credentials_make_no_call() {
    let app = TestApp::new().await;

    let response = app
        .send(post_form("/auth/login", "email=&password=", false, None))
        .await;

    assert_eq!(
        location(&response),
        "/auth/login?error=BLANK&return_to=%2Faccount"
    );
    assert!(app.shopify.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_oauth_start_redirects_to_customer_accounts() {
    let app = TestApp::new().await;

    let response = app
        .send(get("/auth/oauth?return_to=%2Fin%2Faccount%2Forders"))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    let authorize = format!("{}/{SHOP_ID}/auth/oauth/authorize?", app.shopify.uri());
    assert!(target.starts_with(&authorize));
    assert_eq!(query_param(target, "client_id").as_deref(), Some("shp_test_client"));
    assert_eq!(
        query_param(target, "redirect_uri").as_deref(),
        Some("http://localhost:3000/auth/callback")
    );
    assert_eq!(query_param(target, "state").map(|s| s.len()), Some(32));
}

#[tokio::test]
async fn test_callback_with_wrong_state_is_rejected() {
    let app = TestApp::new().await;
    let response = app.send(get("/auth/oauth")).await;
    let cookie = session_cookie(&response);

    let response = app
        .send(get_with_cookie("/auth/callback?code=abc&state=forged", &cookie))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?error=invalid_state");
}

#[tokio::test]
async fn test_callback_denied_by_shopify() {
    let app = TestApp::new().await;

    let response = app
        .send(get("/auth/callback?error=access_denied&error_description=cancelled"))
        .await;

    assert_eq!(location(&response), "/auth/login?error=access_denied");
}

#[tokio::test]
async fn test_oauth_round_trip_returns_to_page() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path(format!("/{SHOP_ID}/auth/oauth/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "shcat_test",
            "id_token": "id-token",
            "refresh_token": "refresh-token",
            "expires_in": 3600
        })))
        .mount(&app.shopify)
        .await;

    let response = app
        .send(get("/auth/oauth?return_to=%2Fgb%2Faccount%2Forders"))
        .await;
    let state = query_param(location(&response), "state").unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .send(get_with_cookie(
            &format!("/auth/callback?code=auth-code&state={state}"),
            &cookie,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/gb/account/orders");
    let cookie = session_cookie(&response);

    // Signing out of an OAuth session ends the Shopify session too
    let response = app
        .send(post_form("/auth/logout", "", false, Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains(&format!("/{SHOP_ID}/auth/oauth/logout?id_token_hint=id-token")));
}
