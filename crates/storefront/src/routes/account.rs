//! Account route handlers.
//!
//! All routes require a signed-in customer. Order history needs the Customer
//! Account API, so customers who signed in with a password are sent through
//! OAuth first.
//!
//! Line items and fulfillments are loaded lazily per order. Each request
//! returns the next page of rows followed by a fresh "load more" row, which
//! replaces the button that asked for it; pages accumulate in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use saffron_core::connection::{Connection, PageRequest};
use saffron_core::sort::OrderSortKey;
use saffron_core::{Country, OrderGid};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::context::PageContext;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{CurrentCountry, RequireCustomer};
use crate::models::{CustomerSession, keys};
use crate::services::orders::{self, OrderParams, OrderQuery};
use crate::shopify::customer::{Fulfillment, LineItem, Order};
use crate::shopify::{CustomerAccessToken, ShopifyError};
use crate::state::AppState;

/// Profile display data.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub name: String,
    pub email: Option<String>,
    /// Signed in through the Customer Account API.
    pub oauth: bool,
}

/// Order row display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub name: String,
    pub processed_on: String,
    pub financial_status: String,
    pub total: String,
    pub line_items_href: String,
    pub fulfillments_href: String,
}

impl OrderView {
    fn new(order: &Order, country: &Country) -> Self {
        let id = order.id.legacy_id().to_string();
        Self {
            line_items_href: country.path(&format!("/account/orders/{id}/line-items")),
            fulfillments_href: country.path(&format!("/account/orders/{id}/fulfillments")),
            id,
            name: order.name.clone(),
            processed_on: order.processed_on(),
            financial_status: order
                .financial_status
                .map_or("Unknown", |status| status.label())
                .to_string(),
            total: order.total_price.display(),
        }
    }
}

/// Sortable column header.
#[derive(Debug, Clone)]
pub struct SortHeaderView {
    pub title: &'static str,
    pub href: String,
    /// `aria-sort` value on the active column.
    pub aria_sort: Option<&'static str>,
}

/// Order line display data.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: i64,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

impl From<&LineItem> for LineItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            title: item.title.clone(),
            variant_title: item
                .variant_title
                .clone()
                .filter(|title| title != "Default Title"),
            quantity: item.quantity,
            price: item.price.as_ref().map(saffron_core::Price::display),
            image_url: item.image.as_ref().map(|image| image.url.clone()),
        }
    }
}

/// Tracking link display data.
#[derive(Debug, Clone)]
pub struct TrackingView {
    pub label: String,
    pub url: Option<String>,
}

/// Fulfillment display data.
#[derive(Debug, Clone)]
pub struct FulfillmentView {
    pub status: &'static str,
    /// Badge style (`success`, `secondary`, `destructive`, `outline`).
    pub badge: &'static str,
    pub created_on: Option<String>,
    pub estimated_delivery: Option<String>,
    pub tracking: Vec<TrackingView>,
}

fn display_date(timestamp: Option<&str>) -> Option<String> {
    let parsed = chrono::DateTime::parse_from_rfc3339(timestamp?).ok()?;
    Some(parsed.format("%b %-d, %Y").to_string())
}

impl From<&Fulfillment> for FulfillmentView {
    fn from(fulfillment: &Fulfillment) -> Self {
        Self {
            status: fulfillment.status.label(),
            badge: fulfillment.status.badge().as_str(),
            created_on: display_date(fulfillment.created_at.as_deref()),
            estimated_delivery: display_date(fulfillment.estimated_delivery_at.as_deref()),
            tracking: fulfillment
                .tracking_information
                .iter()
                .map(|tracking| TrackingView {
                    label: match (&tracking.company, &tracking.number) {
                        (Some(company), Some(number)) => format!("{company} {number}"),
                        (None, Some(number)) => number.clone(),
                        (Some(company), None) => company.clone(),
                        (None, None) => "Tracking".to_string(),
                    },
                    url: tracking.url.clone(),
                })
                .collect(),
        }
    }
}

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub page: PageContext,
    pub profile: ProfileView,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub page: PageContext,
    pub search: String,
    pub orders_href: String,
    pub orders: Vec<OrderView>,
    pub headers: Vec<SortHeaderView>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

/// Order table fragment (HTMX search, sort and paging).
///
/// The full page includes the same partial, so field names match.
#[derive(Template, WebTemplate)]
#[template(path = "partials/orders_table.html")]
pub struct OrdersTableTemplate {
    pub search: String,
    pub orders_href: String,
    pub orders: Vec<OrderView>,
    pub headers: Vec<SortHeaderView>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

/// Line items page fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_line_items.html")]
pub struct LineItemsTemplate {
    pub items: Vec<LineItemView>,
    pub more: Option<String>,
}

/// Fulfillments page fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_fulfillments.html")]
pub struct FulfillmentsTemplate {
    pub fulfillments: Vec<FulfillmentView>,
    pub more: Option<String>,
}

/// `?after=` for nested pages.
#[derive(Debug, Deserialize)]
pub struct NestedQuery {
    pub after: Option<String>,
}

/// Where to send a password-session customer who needs OAuth.
fn oauth_redirect(country: &Country, path: &str) -> Response {
    let return_to = country.path(path);
    Redirect::to(&format!(
        "/auth/oauth?return_to={}",
        urlencoding::encode(&return_to)
    ))
    .into_response()
}

/// Drop a rejected token and send the customer to sign in again.
async fn reauthenticate(session: &Session, country: &Country, path: &str) -> Response {
    if let Err(e) = session.remove_value(keys::CUSTOMER).await {
        tracing::warn!(error = %e, "Failed to clear rejected customer token");
    }
    let return_to = country.path(path);
    Redirect::to(&format!(
        "/auth/login?error=session_expired&return_to={}",
        urlencoding::encode(&return_to)
    ))
    .into_response()
}

fn next_link(connection_has_next: bool, cursor: Option<&str>, base: &str) -> Option<String> {
    connection_has_next
        .then_some(cursor)
        .flatten()
        .map(|cursor| format!("{base}?after={}", urlencoding::encode(cursor)))
}

fn parse_order_id(id: &str) -> Result<OrderGid, AppError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::NotFound(format!("order {id}")));
    }
    Ok(OrderGid::new_unchecked(format!("gid://shopify/Order/{id}")))
}

/// Display the account overview.
///
/// # Errors
///
/// Returns a gateway error if Shopify fails for reasons other than an
/// expired token.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Response, AppError> {
    let profile = match &customer {
        CustomerSession::Oauth(token) => {
            match state.customer().get_customer(&token.access_token).await {
                Ok(customer) => ProfileView {
                    name: customer.display_name(),
                    email: customer.email().map(String::from),
                    oauth: true,
                },
                Err(ShopifyError::Unauthorized) => {
                    return Ok(reauthenticate(&session, &page.country, "/account").await);
                }
                Err(e) => return Err(e.into()),
            }
        }
        CustomerSession::Classic { access_token, .. } => {
            match state.storefront().get_customer_by_token(access_token).await {
                Ok(customer) => {
                    let name = [customer.first_name.as_deref(), customer.last_name.as_deref()]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" ");
                    ProfileView {
                        name: if name.is_empty() {
                            customer.email.clone().unwrap_or_else(|| "Customer".to_string())
                        } else {
                            name
                        },
                        email: customer.email,
                        oauth: false,
                    }
                }
                Err(ShopifyError::Unauthorized) => {
                    return Ok(reauthenticate(&session, &page.country, "/account").await);
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    Ok(AccountIndexTemplate { page, profile }.into_response())
}

fn sort_headers(query: &OrderQuery, base: &str) -> Vec<SortHeaderView> {
    [
        ("Order", OrderSortKey::Id),
        ("Date", OrderSortKey::ProcessedAt),
        ("Total", OrderSortKey::TotalPrice),
    ]
    .into_iter()
    .map(|(title, key)| SortHeaderView {
        title,
        href: format!("{base}{}", query.sort_link(key)),
        aria_sort: (query.sort == key).then_some(if query.reverse {
            "descending"
        } else {
            "ascending"
        }),
    })
    .collect()
}

fn orders_table(query: &OrderQuery, orders: &Connection<Order>, country: &Country) -> OrdersTableTemplate {
    let base = country.path("/account/orders");
    let info = &orders.page_info;
    OrdersTableTemplate {
        search: query.search.clone().unwrap_or_default(),
        orders: orders
            .nodes()
            .map(|order| OrderView::new(order, country))
            .collect(),
        headers: sort_headers(query, &base),
        previous: info
            .has_previous_page
            .then_some(info.start_cursor.as_ref())
            .flatten()
            .map(|cursor| format!("{base}{}", query.link(&PageRequest::Before(cursor.clone())))),
        next: info
            .has_next_page
            .then_some(info.end_cursor.as_ref())
            .flatten()
            .map(|cursor| format!("{base}{}", query.link(&PageRequest::After(cursor.clone())))),
        orders_href: base,
    }
}

fn oauth_token(customer: &CustomerSession) -> Option<&CustomerAccessToken> {
    customer.oauth()
}

/// Display the order history.
///
/// HTMX requests (search, sort, paging) get only the table fragment.
///
/// # Errors
///
/// Returns a gateway error if the Customer Account API fails.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    headers: HeaderMap,
    RequireCustomer(customer): RequireCustomer,
    Query(params): Query<OrderParams>,
) -> Result<Response, AppError> {
    let Some(token) = oauth_token(&customer) else {
        return Ok(oauth_redirect(&page.country, "/account/orders"));
    };

    let query = OrderQuery::from(params);
    let history = match orders::load_history(state.customer(), &token.access_token, &query).await {
        Ok(history) => history,
        Err(ShopifyError::Unauthorized) => {
            return Ok(reauthenticate(&session, &page.country, "/account/orders").await);
        }
        Err(e) => return Err(e.into()),
    };

    let table = orders_table(&query, &history, &page.country);
    if headers.contains_key("hx-request") {
        return Ok(table.into_response());
    }

    Ok(OrdersTemplate {
        page,
        search: table.search,
        orders_href: table.orders_href,
        orders: table.orders,
        headers: table.headers,
        previous: table.previous,
        next: table.next,
    }
    .into_response())
}

/// Next page of an order's line items (HTMX fragment).
///
/// # Errors
///
/// Returns 404 for an unknown order, 401 without an OAuth session, or a
/// gateway error.
#[instrument(skip(state, customer))]
pub async fn line_items(
    State(state): State<AppState>,
    CurrentCountry(country): CurrentCountry,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<String>,
    Query(query): Query<NestedQuery>,
) -> Result<Response, AppError> {
    let token = oauth_token(&customer)
        .ok_or_else(|| AppError::Unauthorized("order history requires account sign-in".to_string()))?;
    let order_id = parse_order_id(&id)?;

    let page = state
        .customer()
        .get_order_line_items(&token.access_token, &order_id, query.after.as_deref())
        .await?;

    let base = country.path(&format!("/account/orders/{id}/line-items"));
    Ok(LineItemsTemplate {
        items: page.nodes().map(LineItemView::from).collect(),
        more: next_link(
            page.page_info.has_next_page,
            page.page_info.end_cursor.as_deref(),
            &base,
        ),
    }
    .into_response())
}

/// Next page of an order's fulfillments (HTMX fragment).
///
/// # Errors
///
/// Returns 404 for an unknown order, 401 without an OAuth session, or a
/// gateway error.
#[instrument(skip(state, customer))]
pub async fn fulfillments(
    State(state): State<AppState>,
    CurrentCountry(country): CurrentCountry,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<String>,
    Query(query): Query<NestedQuery>,
) -> Result<Response, AppError> {
    let token = oauth_token(&customer)
        .ok_or_else(|| AppError::Unauthorized("order history requires account sign-in".to_string()))?;
    let order_id = parse_order_id(&id)?;

    let page = state
        .customer()
        .get_order_fulfillments(&token.access_token, &order_id, query.after.as_deref())
        .await?;

    let base = country.path(&format!("/account/orders/{id}/fulfillments"));
    Ok(FulfillmentsTemplate {
        fulfillments: page.nodes().map(FulfillmentView::from).collect(),
        more: next_link(
            page.page_info.has_next_page,
            page.page_info.end_cursor.as_deref(),
            &base,
        ),
    }
    .into_response())
}
