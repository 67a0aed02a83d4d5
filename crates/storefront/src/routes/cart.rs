//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation goes through [`CartService`]; the response carries an
//! `HX-Trigger` header with a `cart-updated` event (new item count) and, on
//! failure, a `toast` event with a message for the shopper.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use saffron_core::{CartLineGid, Country, Price, VariantGid, format_money};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use super::context::PageContext;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::CurrentCountry;
use crate::services::cart::{CartError, CartItem, CartService, CartSnapshot};
use crate::shopify::StorefrontClient;
use crate::state::AppState;

/// Response header HTMX reads client-side events from.
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// One entry of a line's quantity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityOption {
    pub value: u32,
    pub selected: bool,
}

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub line_id: String,
    pub href: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: u32,
    /// Quantities offered in the selector, `1..=limit`.
    pub quantity_options: Vec<QuantityOption>,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl CartItemView {
    fn new(item: &CartItem, country: &Country) -> Self {
        let limit = item.max_quantity().max(item.quantity);
        Self {
            line_id: item.line_id.to_string(),
            href: country.path(&format!("/products/{}", item.product_handle)),
            title: item.title.clone(),
            variant_title: Some(item.variant_title.clone())
                .filter(|title| !title.is_empty() && title != "Default Title"),
            quantity: item.quantity,
            quantity_options: (1..=limit)
                .map(|value| QuantityOption {
                    value,
                    selected: value == item.quantity,
                })
                .collect(),
            price: item.price.display(),
            line_price: item.line_total.display(),
            image_url: item.image_url.clone(),
        }
    }
}

fn money_or_zero(price: Option<&Price>, country: &Country) -> String {
    price.map_or_else(|| format_money("0", country.currency), Price::display)
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub total: String,
    pub item_count: u32,
    pub has_checkout: bool,
    /// Cart path for this country; line forms post below it.
    pub base: String,
}

impl CartView {
    #[must_use]
    pub fn new(snapshot: &CartSnapshot, country: &Country) -> Self {
        Self {
            items: snapshot
                .items
                .iter()
                .map(|item| CartItemView::new(item, country))
                .collect(),
            subtotal: money_or_zero(snapshot.subtotal_amount.as_ref(), country),
            total: money_or_zero(snapshot.total_amount.as_ref(), country),
            item_count: snapshot.item_count,
            has_checkout: snapshot.checkout_url.is_some() && !snapshot.items.is_empty(),
            base: country.path("/cart"),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
    /// Stock reported on the product page; absent when untracked.
    pub quantity_available: Option<i64>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub checkout_href: String,
}

/// Cart items fragment template (for HTMX).
///
/// The cart page includes the same partial, so field names match.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub checkout_href: String,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// `HX-Trigger` value for a cart change and an optional toast.
#[must_use]
pub fn hx_trigger(count: u32, toast: Option<(&str, &str)>) -> HeaderValue {
    let mut events = json!({ "cart-updated": { "count": count } });
    if let Some((level, message)) = toast {
        events["toast"] = json!({ "level": level, "message": message });
    }
    HeaderValue::from_str(&events.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("cart-updated"))
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

type StorefrontCart<'a> = CartService<'a, StorefrontClient>;

fn cart<'a>(state: &'a AppState, session: &'a Session, country: Country) -> StorefrontCart<'a> {
    CartService::new(state.storefront(), session, state.cipher(), country)
}

/// Local snapshot after a failed mutation, for re-rendering.
async fn current_snapshot(service: &StorefrontCart<'_>) -> CartSnapshot {
    service.load().await.unwrap_or_default()
}

fn log_failure(error: &CartError, action: &str) {
    match error {
        CartError::Quantity(_) | CartError::LineNotFound | CartError::NoCart => {
            tracing::info!(error = %error, action, "Cart change rejected");
        }
        _ => tracing::error!(error = %error, action, "Cart change failed"),
    }
}

/// Display the cart page.
///
/// Resyncs against the remote cart first; if Shopify is unreachable the
/// local snapshot is shown as-is.
#[instrument(skip(state, session, page))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> impl IntoResponse {
    let service = cart(&state, &session, page.country);
    let snapshot = match service.resync().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "Cart resync failed; showing local snapshot");
            current_snapshot(&service).await
        }
    };

    CartShowTemplate {
        cart: CartView::new(&snapshot, &page.country),
        checkout_href: page.link("/checkout"),
        page,
    }
}

/// Add an item to the cart (HTMX).
///
/// Returns the count badge. Without HTMX, redirects to the cart page.
#[instrument(skip(state, session, headers, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(country): CurrentCountry,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let service = cart(&state, &session, country);

    let result = match VariantGid::parse(&form.variant_id) {
        Some(variant_id) => {
            service
                .add(variant_id, form.quantity.unwrap_or(1), form.quantity_available)
                .await
        }
        None => Err(CartError::LineNotFound),
    };

    if !is_htmx(&headers) {
        if let Err(e) = &result {
            log_failure(e, "add");
        }
        return Redirect::to(&country.path("/cart")).into_response();
    }

    match result {
        Ok(snapshot) => {
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("variant_id", form.variant_id.as_str())][..]),
            );
            (
                [(
                    HX_TRIGGER,
                    hx_trigger(snapshot.item_count, Some(("success", "Added to your cart"))),
                )],
                CartCountTemplate {
                    count: snapshot.item_count,
                },
            )
                .into_response()
        }
        Err(e) => {
            log_failure(&e, "add");
            let count = current_snapshot(&service).await.item_count;
            (
                [(HX_TRIGGER, hx_trigger(count, Some(("error", e.user_message().as_str()))))],
                CartCountTemplate { count },
            )
                .into_response()
        }
    }
}

async fn items_response(
    service: &StorefrontCart<'_>,
    country: &Country,
    result: Result<CartSnapshot, CartError>,
    action: &str,
) -> Response {
    let checkout_href = country.path("/checkout");
    match result {
        Ok(snapshot) => (
            [(HX_TRIGGER, hx_trigger(snapshot.item_count, None))],
            CartItemsTemplate {
                cart: CartView::new(&snapshot, country),
                checkout_href,
            },
        )
            .into_response(),
        Err(e) => {
            log_failure(&e, action);
            let snapshot = current_snapshot(service).await;
            (
                [(
                    HX_TRIGGER,
                    hx_trigger(snapshot.item_count, Some(("error", e.user_message().as_str()))),
                )],
                CartItemsTemplate {
                    cart: CartView::new(&snapshot, country),
                    checkout_href,
                },
            )
                .into_response()
        }
    }
}

/// Update a line's quantity (HTMX). Returns the cart items fragment.
#[instrument(skip(state, session, headers, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(country): CurrentCountry,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let service = cart(&state, &session, country);
    let result = match CartLineGid::parse(&form.line_id) {
        Some(line_id) => service.update_quantity(&line_id, form.quantity).await,
        None => Err(CartError::LineNotFound),
    };

    if !is_htmx(&headers) {
        return Redirect::to(&country.path("/cart")).into_response();
    }
    items_response(&service, &country, result, "update").await
}

/// Remove a line (HTMX). Returns the cart items fragment.
#[instrument(skip(state, session, headers, form))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(country): CurrentCountry,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let service = cart(&state, &session, country);
    let result = match CartLineGid::parse(&form.line_id) {
        Some(line_id) => service.remove(&line_id).await,
        None => Err(CartError::LineNotFound),
    };

    if !is_htmx(&headers) {
        return Redirect::to(&country.path("/cart")).into_response();
    }
    items_response(&service, &country, result, "remove").await
}

/// Drop the local cart for this country (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(country): CurrentCountry,
    headers: HeaderMap,
) -> Response {
    let service = cart(&state, &session, country);
    let result = service.clear().await.map(|()| CartSnapshot::default());

    if !is_htmx(&headers) {
        return Redirect::to(&country.path("/cart")).into_response();
    }
    items_response(&service, &country, result, "clear").await
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(country): CurrentCountry,
) -> impl IntoResponse {
    let count = current_snapshot(&cart(&state, &session, country))
        .await
        .item_count;
    CartCountTemplate { count }
}

/// Redirect to the Shopify checkout for this country's cart.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(country): CurrentCountry,
) -> Response {
    match cart(&state, &session, country).checkout_url().await {
        Ok(Some(url)) => Redirect::to(&url).into_response(),
        Ok(None) => Redirect::to(&country.path("/cart")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read cart for checkout");
            Redirect::to(&country.path("/cart")).into_response()
        }
    }
}
