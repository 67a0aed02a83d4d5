//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! Page routes are matched after the country middleware has stripped the
//! `/{country}` segment, so `/in/products/chai` is routed as
//! `/products/chai`.
//!
//! ```text
//! GET  /                              - Home page
//! GET  /products/{handle}             - Product detail
//! GET  /products/{handle}/recommendations - Related products (HTMX)
//! GET  /collections                   - Collection listing
//! GET  /collections/{handle}          - Collection detail (sort, paging)
//! GET  /search                        - Product search (full page or HTMX fragment)
//! GET  /policies/{handle}             - Shop policy
//!
//! # Cart (HTMX fragments, HX-Trigger: cart-updated)
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add a variant
//! POST /cart/update                   - Set a line quantity
//! POST /cart/remove                   - Remove a line
//! POST /cart/clear                    - Empty the cart
//! GET  /cart/count                    - Cart count badge
//! GET  /checkout                      - Redirect to Shopify checkout
//!
//! # Wishlist
//! GET  /wishlist                      - Saved variants
//! POST /wishlist/toggle               - Save or unsave (HX-Trigger: wishlist-updated)
//!
//! # Account (requires a signed-in customer)
//! GET  /account                       - Profile
//! GET  /account/orders                - Order history (search, sort, paging)
//! GET  /account/orders/{id}/line-items   - Next page of line items (HTMX)
//! GET  /account/orders/{id}/fulfillments - Next page of fulfillments (HTMX)
//!
//! # No country segment
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Email and password login
//! GET  /auth/oauth                    - Start Customer Account OAuth
//! GET  /auth/callback                 - OAuth callback
//! POST /auth/refresh                  - Refresh the OAuth token
//! POST /auth/logout                   - Sign out
//! GET  /api/cart                      - Cart snapshot JSON (?country=)
//! GET  /api/customer                  - Signed-in customer JSON
//! GET  /sitemap.xml                   - Sitemap for every country
//! GET  /robots.txt                    - Robots rules
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod collections;
pub mod context;
pub mod home;
pub mod policies;
pub mod products;
pub mod search;
pub mod sitemap;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, cart_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/oauth", get(auth::oauth_start))
        .route("/callback", get(auth::callback))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(api::cart))
        .route("/customer", get(api::customer))
        .layer(cart_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{handle}", get(products::show))
        .route("/{handle}/recommendations", get(products::recommendations))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .layer(cart_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index))
        .route("/toggle", post(wishlist::toggle))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
        .route("/orders/{id}/line-items", get(account::line_items))
        .route("/orders/{id}/fulfillments", get(account::fulfillments))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/collections", collection_routes())
        .route("/search", get(search::index))
        .route("/policies/{handle}", get(policies::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/wishlist", wishlist_routes())
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/robots.txt", get(sitemap::robots))
}
