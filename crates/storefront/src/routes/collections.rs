//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use saffron_core::connection::PageRequest;
use saffron_core::sort::{SORT_OPTIONS, SortOption, resolve_sort};
use saffron_core::text::title_or_slug;
use serde::Deserialize;
use tracing::instrument;

use super::context::{ImageView, PageContext, Pagination, ProductCardView};
use crate::error::AppError;
use crate::filters;
use crate::shopify::{Collection, ShopifyError};
use crate::state::AppState;

/// Collection card display data.
#[derive(Debug, Clone)]
pub struct CollectionView {
    pub href: String,
    pub title: String,
    pub description: String,
    pub image: Option<ImageView>,
}

/// A sort dropdown entry.
#[derive(Debug, Clone)]
pub struct SortLinkView {
    pub title: &'static str,
    pub href: String,
    pub active: bool,
}

/// `?sort=&after=&before=` parameters shared by listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub sort: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

/// Sort dropdown links for a listing at `base`, keeping `extra` query pairs.
pub fn sort_links(base: &str, active: SortOption, extra: &[(&str, &str)]) -> Vec<SortLinkView> {
    SORT_OPTIONS
        .iter()
        .map(|option| {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("sort", option.slug);
            SortLinkView {
                title: option.title,
                href: format!("{base}?{}", query.finish()),
                active: option.slug == active.slug,
            }
        })
        .collect()
}

/// Cursor link for a listing at `base`, keeping sort and `extra` pairs.
pub fn page_link(
    base: &str,
    sort: SortOption,
    extra: &[(&str, &str)],
    param: &str,
    cursor: &str,
) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in extra {
        query.append_pair(key, value);
    }
    query.append_pair("sort", sort.slug);
    query.append_pair(param, cursor);
    format!("{base}?{}", query.finish())
}

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub page: PageContext,
    pub collections: Vec<CollectionView>,
    pub next: Option<String>,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub page: PageContext,
    pub title: String,
    pub description: String,
    pub products: Vec<ProductCardView>,
    pub sort_links: Vec<SortLinkView>,
    pub pagination: Pagination,
}

/// `?after=` parameter of the collection index.
#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub after: Option<String>,
}

fn collection_view(collection: &Collection, page: &PageContext) -> CollectionView {
    CollectionView {
        href: page.link(&format!("/collections/{}", collection.handle)),
        title: title_or_slug(&collection.title, &collection.handle),
        description: collection.description.clone(),
        image: collection
            .image
            .as_ref()
            .map(|image| ImageView::new(image, &collection.title)),
    }
}

/// Display the collection listing.
///
/// Falls back to an empty listing if Shopify is unreachable.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<IndexQuery>,
) -> impl IntoResponse {
    let collections = state
        .storefront()
        .get_collections(query.after.as_deref(), &page.country)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load collections");
            Default::default()
        });

    let next = collections
        .page_info
        .has_next_page
        .then(|| collections.page_info.end_cursor.clone())
        .flatten()
        .map(|cursor| {
            format!(
                "{}?after={}",
                page.link("/collections"),
                urlencoding::encode(&cursor)
            )
        });

    CollectionsIndexTemplate {
        collections: collections
            .nodes()
            .map(|collection| collection_view(collection, &page))
            .collect(),
        next,
        page,
    }
}

/// Display a collection with sorting and cursor pagination.
///
/// # Errors
///
/// Returns 404 for unknown handles and a gateway error if Shopify fails.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(handle): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Response, AppError> {
    let sort = resolve_sort(query.sort.as_deref());
    let request = PageRequest::from_cursors(query.after, query.before);

    let collection = match state
        .storefront()
        .get_collection(&handle, &request, sort.config, &page.country)
        .await
    {
        Ok(collection) => collection,
        Err(ShopifyError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("collection {handle}")));
        }
        Err(e) => return Err(e.into()),
    };

    let base = page.link(&format!("/collections/{handle}"));
    let pagination = Pagination::new(&collection.products.page_info, |param, cursor| {
        page_link(&base, sort, &[], param, cursor)
    });

    Ok(CollectionShowTemplate {
        title: title_or_slug(&collection.title, &handle),
        description: collection.description.clone(),
        products: collection
            .products
            .nodes()
            .map(|product| ProductCardView::new(product, &page.country))
            .collect(),
        sort_links: sort_links(&base, sort, &[]),
        pagination,
        page,
    }
    .into_response())
}
