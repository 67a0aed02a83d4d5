//! Shared page context and view types for templates.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
};
use chrono::Utc;
use saffron_core::theme::{CalendarDate, Theme, active_theme};
use saffron_core::{COUNTRIES, Country};
use tower_sessions::Session;

use crate::middleware::country::split_country_segment;
use crate::middleware::{CspNonce, OptionalCustomer};
use crate::services::cart::CartService;
use crate::services::wishlist::WishlistStore;
use crate::shopify::{Image, MenuItem, Product};
use crate::state::AppState;

/// Handle of the Shopify navigation menu.
pub const MAIN_MENU: &str = "main-menu";

/// Navigation used when the Shopify menu cannot be loaded.
const FALLBACK_MENU: &[(&str, &str)] = &[
    ("Shop all", "/collections/all"),
    ("Collections", "/collections"),
    ("Search", "/search"),
];

/// A navigation link, already prefixed with the country segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

/// Everything the base layout needs.
///
/// Extracting this loads the menu (cached), the active theme, and the cart and
/// wishlist counts. Failures fall back to empty values; a page never fails
/// because its chrome could not load.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub country: Country,
    pub nonce: String,
    pub theme: Option<&'static Theme>,
    pub menu: Vec<NavLink>,
    pub cart_count: u32,
    pub wishlist_count: usize,
    pub signed_in: bool,
    /// Request path without the country segment.
    pub path: String,
}

impl PageContext {
    /// Site path under the visitor's country.
    #[must_use]
    pub fn link(&self, path: &str) -> String {
        self.country.path(path)
    }

    /// The current page under another country.
    #[must_use]
    pub fn switch_link(&self, country: &Country) -> String {
        country.path(&self.path)
    }

    /// Countries offered in the switcher.
    #[must_use]
    pub const fn countries(&self) -> &'static [Country] {
        COUNTRIES
    }

    /// CSS class for `<body>`.
    #[must_use]
    pub fn body_class(&self) -> &'static str {
        self.theme.map_or("theme-default", |theme| theme.palette)
    }
}

/// Turn a Shopify menu URL into a site path under `country`.
///
/// Menu URLs are absolute on the shop domain; only the path is kept.
#[must_use]
pub fn menu_link(item: &MenuItem, country: &Country) -> Option<NavLink> {
    let raw = item.url.as_deref()?;
    let path = url::Url::parse(raw)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| raw.to_string());
    if !path.starts_with('/') {
        return None;
    }
    Some(NavLink {
        title: item.title.clone(),
        href: country.path(&path),
    })
}

/// The requested path with its country segment removed.
///
/// Nested routers see a stripped URI, so this reads the original one.
fn unlocalized_path(parts: &Parts) -> String {
    let path = parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |OriginalUri(uri)| uri.path());
    split_country_segment(path).map_or(path, |(_, rest)| rest).to_string()
}

fn fallback_menu(country: &Country) -> Vec<NavLink> {
    FALLBACK_MENU
        .iter()
        .map(|(title, path)| NavLink {
            title: (*title).to_string(),
            href: country.path(path),
        })
        .collect()
}

impl<S> FromRequestParts<S> for PageContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let country = parts.extensions.get::<Country>().copied().unwrap_or_default();
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, &state).await?;
        let OptionalCustomer(customer) = OptionalCustomer::from_request_parts(parts, &state).await?;

        let menu = match state.storefront().get_menu(MAIN_MENU).await {
            Ok(menu) => {
                let links: Vec<NavLink> = menu
                    .items
                    .iter()
                    .filter_map(|item| menu_link(item, &country))
                    .collect();
                if links.is_empty() {
                    fallback_menu(&country)
                } else {
                    links
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load navigation menu");
                fallback_menu(&country)
            }
        };

        let (cart_count, wishlist_count) = match parts.extensions.get::<Session>() {
            Some(session) => {
                let cart = CartService::new(state.storefront(), session, state.cipher(), country);
                let cart_count = cart.load().await.map_or(0, |snapshot| snapshot.item_count);
                let wishlist_count = WishlistStore::new(session)
                    .load()
                    .await
                    .map_or(0, |wishlist| wishlist.len());
                (cart_count, wishlist_count)
            }
            None => (0, 0),
        };

        let today = CalendarDate::from(Utc::now().date_naive());

        Ok(Self {
            country,
            nonce,
            theme: active_theme(today, country.code),
            menu,
            cart_count,
            wishlist_count,
            signed_in: customer.is_some(),
            path: unlocalized_path(parts),
        })
    }
}

// =============================================================================
// View types
// =============================================================================

/// Image display data for templates.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

impl ImageView {
    #[must_use]
    pub fn new(image: &Image, fallback_alt: &str) -> Self {
        Self {
            url: image.url.clone(),
            alt: image
                .alt_text
                .clone()
                .unwrap_or_else(|| fallback_alt.to_string()),
        }
    }
}

/// Product card display data for grids.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub href: String,
    pub title: String,
    pub price: String,
    pub image: Option<ImageView>,
    pub available: bool,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, country: &Country) -> Self {
        Self {
            href: country.path(&format!("/products/{}", product.handle)),
            title: product.title.clone(),
            price: product.price_range.min_variant_price.display(),
            image: product
                .featured_image
                .as_ref()
                .map(|image| ImageView::new(image, &product.title)),
            available: product.available_for_sale,
        }
    }
}

/// Previous/next links for a cursor-paginated list.
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Pagination {
    /// Build links from page info; `link` turns a `(param, cursor)` pair into an href.
    pub fn new(
        page_info: &saffron_core::connection::PageInfo,
        link: impl Fn(&str, &str) -> String,
    ) -> Self {
        Self {
            previous: page_info
                .has_previous_page
                .then_some(page_info.start_cursor.as_deref())
                .flatten()
                .map(|cursor| link("before", cursor)),
            next: page_info
                .has_next_page
                .then_some(page_info.end_cursor.as_deref())
                .flatten()
                .map(|cursor| link("after", cursor)),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}
