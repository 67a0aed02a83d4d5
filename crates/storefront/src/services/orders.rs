//! Order history paging, sorting and search.
//!
//! Orders come a page at a time from the Customer Account API. Search
//! narrows the fetched page only; it does not query further pages.

use saffron_core::connection::{Connection, PageRequest};
use saffron_core::sort::OrderSortKey;
use serde::Deserialize;
use tracing::instrument;

use crate::shopify::customer::Order;
use crate::shopify::{CustomerClient, ShopifyError};

/// Raw `?after=&before=&sort=&dir=&q=` parameters of the order history page.
#[derive(Debug, Default, Deserialize)]
pub struct OrderParams {
    pub after: Option<String>,
    pub before: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub q: Option<String>,
}

/// A validated order history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub page: PageRequest,
    pub sort: OrderSortKey,
    /// Descending when true.
    pub reverse: bool,
    pub search: Option<String>,
}

impl Default for OrderQuery {
    /// Newest first.
    fn default() -> Self {
        Self {
            page: PageRequest::First,
            sort: OrderSortKey::ProcessedAt,
            reverse: true,
            search: None,
        }
    }
}

impl From<OrderParams> for OrderQuery {
    fn from(params: OrderParams) -> Self {
        let sort = params
            .sort
            .as_deref()
            .and_then(OrderSortKey::from_field)
            .unwrap_or_default();
        let reverse = !matches!(params.dir.as_deref(), Some("asc"));
        let search = params
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Self {
            page: PageRequest::from_cursors(params.after, params.before),
            sort,
            reverse,
            search,
        }
    }
}

impl OrderQuery {
    const fn direction(&self) -> &'static str {
        if self.reverse { "desc" } else { "asc" }
    }

    /// Query string for a link that keeps sort and search but moves to `page`.
    #[must_use]
    pub fn link(&self, page: &PageRequest) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("sort", self.sort.field());
        query.append_pair("dir", self.direction());
        if let Some(search) = &self.search {
            query.append_pair("q", search);
        }
        match page {
            PageRequest::First => {}
            PageRequest::After(cursor) => {
                query.append_pair("after", cursor);
            }
            PageRequest::Before(cursor) => {
                query.append_pair("before", cursor);
            }
        }
        format!("?{}", query.finish())
    }

    /// Query string that sorts by `sort`, flipping direction if it is already
    /// the active field. Returns to the first page.
    #[must_use]
    pub fn sort_link(&self, sort: OrderSortKey) -> String {
        let next = Self {
            page: PageRequest::First,
            sort,
            reverse: if sort == self.sort { !self.reverse } else { true },
            search: self.search.clone(),
        };
        next.link(&PageRequest::First)
    }
}

/// Whether an order matches a free-text search.
///
/// Matches the order name/number, payment status label, or total amount,
/// case-insensitively.
#[must_use]
pub fn matches_search(order: &Order, search: &str) -> bool {
    let needle = search.trim().trim_start_matches('#').to_lowercase();
    if needle.is_empty() {
        return true;
    }

    order.name.to_lowercase().contains(&needle)
        || order.number.to_string().contains(&needle)
        || order
            .financial_status
            .is_some_and(|status| status.label().to_lowercase().contains(&needle))
        || order.total_price.amount.to_string().contains(&needle)
}

/// Narrow a fetched page to orders matching `search`, keeping page info.
#[must_use]
pub fn filter_page(mut orders: Connection<Order>, search: Option<&str>) -> Connection<Order> {
    if let Some(search) = search {
        orders.edges.retain(|edge| matches_search(&edge.node, search));
    }
    orders
}

/// Fetch one page of order history and apply the search filter.
///
/// # Errors
///
/// Returns an error if the Customer Account API request fails.
#[instrument(skip(customer, access_token))]
pub async fn load_history(
    customer: &CustomerClient,
    access_token: &str,
    query: &OrderQuery,
) -> Result<Connection<Order>, ShopifyError> {
    let orders = customer
        .get_orders(access_token, &query.page, query.sort, query.reverse, None)
        .await?;
    Ok(filter_page(orders, query.search.as_deref()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use saffron_core::connection::Edge;
    use serde_json::json;

    use super::*;

    fn order(number: i64, status: &str, amount: &str) -> Order {
        serde_json::from_value(json!({
            "id": format!("gid://shopify/Order/{number}"),
            "name": format!("#{number}"),
            "number": number,
            "processedAt": "2026-05-01T09:00:00Z",
            "financialStatus": status,
            "totalPrice": {"amount": amount, "currencyCode": "GBP"}
        }))
        .unwrap()
    }

    #[test]
    fn test_params_default_to_newest_first() {
        let query = OrderQuery::from(OrderParams::default());
        assert_eq!(query, OrderQuery::default());
    }

    #[test]
    fn test_params_parse_sort_direction_and_cursor() {
        let query = OrderQuery::from(OrderParams {
            after: Some("abc".to_string()),
            before: None,
            sort: Some("total".to_string()),
            dir: Some("asc".to_string()),
            q: Some("  refunded ".to_string()),
        });
        assert_eq!(query.page, PageRequest::After("abc".to_string()));
        assert_eq!(query.sort, OrderSortKey::TotalPrice);
        assert!(!query.reverse);
        assert_eq!(query.search.as_deref(), Some("refunded"));

        let unknown = OrderQuery::from(OrderParams {
            sort: Some("colour".to_string()),
            ..OrderParams::default()
        });
        assert_eq!(unknown.sort, OrderSortKey::ProcessedAt);
    }

    #[test]
    fn test_links_keep_sort_and_search() {
        let query = OrderQuery {
            search: Some("#10 01".to_string()),
            ..OrderQuery::default()
        };
        assert_eq!(
            query.link(&PageRequest::After("c2".to_string())),
            "?sort=date&dir=desc&q=%2310+01&after=c2"
        );
        assert_eq!(
            query.sort_link(OrderSortKey::ProcessedAt),
            "?sort=date&dir=asc&q=%2310+01"
        );
        assert_eq!(
            query.sort_link(OrderSortKey::TotalPrice),
            "?sort=total&dir=desc&q=%2310+01"
        );
    }

    #[test]
    fn test_search_filters_fetched_page_only() {
        let page = Connection {
            edges: vec![
                Edge {
                    cursor: Some("a".to_string()),
                    node: order(1001, "PAID", "20.00"),
                },
                Edge {
                    cursor: Some("b".to_string()),
                    node: order(1002, "REFUNDED", "35.50"),
                },
            ],
            page_info: saffron_core::connection::PageInfo {
                has_next_page: true,
                ..Default::default()
            },
        };

        let refunded = filter_page(page.clone(), Some("refund"));
        assert_eq!(refunded.len(), 1);
        assert!(refunded.page_info.has_next_page);

        assert_eq!(filter_page(page.clone(), Some("#1001")).len(), 1);
        assert_eq!(filter_page(page.clone(), Some("35.5")).len(), 1);
        assert_eq!(filter_page(page, None).len(), 2);
    }
}
