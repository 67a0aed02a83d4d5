//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use saffron_core::connection::PageRequest;
use saffron_core::sort::{resolve_sort, sort_config};
use tracing::instrument;

use super::context::{PageContext, ProductCardView};
use crate::filters;
use crate::state::AppState;

/// Collection featured on the home page.
pub const FEATURED_COLLECTION: &str = "frontpage";

/// Sort option for the home page grid.
const HOME_SORT: &str = "trending";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
}

/// Display the home page.
///
/// Shows the featured collection, falling back to the first page of the
/// catalog, and an empty grid if Shopify is unreachable.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    let country = page.country;
    let sort = sort_config(HOME_SORT).unwrap_or_else(|| resolve_sort(None).config);

    let products = match state
        .storefront()
        .get_collection(FEATURED_COLLECTION, &PageRequest::First, sort, &country)
        .await
    {
        Ok(collection) if !collection.products.is_empty() => collection.products,
        Ok(_) | Err(_) => state
            .storefront()
            .get_products(&PageRequest::First, None, sort, &country)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load home page products");
                Default::default()
            }),
    };

    HomeTemplate {
        products: products
            .nodes()
            .map(|product| ProductCardView::new(product, &country))
            .collect(),
        page,
    }
}
