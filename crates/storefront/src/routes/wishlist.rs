//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use saffron_core::{Country, VariantGid};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::HX_TRIGGER;
use super::context::PageContext;
use crate::error::AppError;
use crate::filters;
use crate::middleware::CurrentCountry;
use crate::services::wishlist::{self, WishlistStore};
use crate::shopify::VariantSummary;
use crate::state::AppState;

/// Saved variant display data.
#[derive(Debug, Clone)]
pub struct WishlistItemView {
    pub variant_id: String,
    pub href: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub quantity_available: Option<i64>,
}

impl WishlistItemView {
    fn new(variant: &VariantSummary, country: &Country) -> Self {
        Self {
            variant_id: variant.id.to_string(),
            href: country.path(&format!(
                "/products/{}?variant={}",
                variant.product.handle,
                variant.id.legacy_id()
            )),
            title: variant.product.title.clone(),
            variant_title: Some(variant.title.clone()).filter(|title| title != "Default Title"),
            price: variant.price.display(),
            image_url: variant
                .image
                .as_ref()
                .or(variant.product.featured_image.as_ref())
                .map(|image| image.url.clone()),
            available: variant.available_for_sale,
            quantity_available: variant.quantity_available,
        }
    }
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub variant_id: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/index.html")]
pub struct WishlistTemplate {
    pub page: PageContext,
    pub items: Vec<WishlistItemView>,
    /// Saved IDs could not be resolved right now.
    pub failed: bool,
}

/// Heart button fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_button.html")]
pub struct WishlistButtonTemplate {
    pub variant_id: String,
    pub saved: bool,
    pub toggle_href: String,
}

/// Display the wishlist.
///
/// Saved IDs are resolved with batched lookups of up to 250; IDs that no longer
/// resolve are hidden but stay saved.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, page))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> Result<Response, AppError> {
    let saved = WishlistStore::new(&session).load().await?;
    let (items, failed) = match wishlist::resolve(state.storefront(), &saved, &page.country).await {
        Ok(variants) => (
            variants
                .iter()
                .map(|variant| WishlistItemView::new(variant, &page.country))
                .collect(),
            false,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resolve wishlist");
            (Vec::new(), true)
        }
    };

    Ok(WishlistTemplate {
        page,
        items,
        failed,
    }
    .into_response())
}

/// Toggle a variant (HTMX). Returns the updated heart button.
///
/// # Errors
///
/// Returns 400 for a malformed variant ID, or an error if the session store
/// fails.
#[instrument(skip(session))]
pub async fn toggle(
    session: Session,
    CurrentCountry(country): CurrentCountry,
    Form(form): Form<ToggleForm>,
) -> Result<Response, AppError> {
    let variant_id = VariantGid::parse(&form.variant_id)
        .ok_or_else(|| AppError::BadRequest("invalid variant id".to_string()))?;
    let store = WishlistStore::new(&session);
    let saved = store.toggle(&variant_id).await?;
    let count = store.load().await?.len();

    let events = json!({ "wishlist-updated": { "count": count, "saved": saved } });
    let trigger = HeaderValue::from_str(&events.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("wishlist-updated"));

    Ok((
        [(HX_TRIGGER, trigger)],
        WishlistButtonTemplate {
            variant_id: variant_id.to_string(),
            saved,
            toggle_href: country.path("/wishlist/toggle"),
        },
    )
        .into_response())
}
