//! Search route handler.
//!
//! Full-text search is delegated to the Storefront API
//! (`products(query:)`); relevance ranking is Shopify's.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use saffron_core::connection::PageRequest;
use saffron_core::sort::resolve_sort;
use serde::Deserialize;
use tracing::instrument;

use super::collections::{SortLinkView, page_link, sort_links};
use super::context::{PageContext, Pagination, ProductCardView};
use crate::filters;
use crate::state::AppState;

/// Longest query we forward to Shopify.
const MAX_QUERY_LEN: usize = 200;

/// `?q=&sort=&after=&before=` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/index.html")]
pub struct SearchTemplate {
    pub page: PageContext,
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub sort_links: Vec<SortLinkView>,
    pub pagination: Pagination,
    pub failed: bool,
}

/// Search results fragment (HTMX, swapped while typing).
///
/// The full page includes the same partial, so field names match.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub sort_links: Vec<SortLinkView>,
    pub pagination: Pagination,
    /// Shopify could not be reached.
    pub failed: bool,
}

/// Normalize a search string: trimmed, bounded, empty is none.
#[must_use]
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_QUERY_LEN).collect())
}

/// Display search results. HTMX requests get only the results fragment.
#[instrument(skip(state, page, headers))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    headers: HeaderMap,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = normalize_query(params.q.as_deref());
    let sort = resolve_sort(params.sort.as_deref());
    let request = PageRequest::from_cursors(params.after, params.before);
    let base = page.link("/search");
    let query_text = query.clone().unwrap_or_default();

    let (products, failed) = match &query {
        Some(q) => match state
            .storefront()
            .get_products(&request, Some(q), sort.config, &page.country)
            .await
        {
            Ok(products) => (products, false),
            Err(e) => {
                tracing::warn!(error = %e, "Search failed");
                (Default::default(), true)
            }
        },
        None => (Default::default(), false),
    };

    let extra = [("q", query_text.as_str())];
    let results = SearchResultsTemplate {
        query: query_text.clone(),
        products: products
            .nodes()
            .map(|product| ProductCardView::new(product, &page.country))
            .collect(),
        sort_links: sort_links(&base, sort, &extra),
        pagination: Pagination::new(&products.page_info, |param, cursor| {
            page_link(&base, sort, &extra, param, cursor)
        }),
        failed,
    };

    if headers.contains_key("hx-request") {
        return results.into_response();
    }

    SearchTemplate {
        page,
        query: results.query,
        products: results.products,
        sort_links: results.sort_links,
        pagination: results.pagination,
        failed: results.failed,
    }
    .into_response()
}
