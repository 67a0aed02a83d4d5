//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use saffron_core::cart::line_limit;
use serde::Deserialize;
use tracing::instrument;

use super::context::{ImageView, PageContext, ProductCardView};
use crate::error::AppError;
use crate::filters;
use crate::middleware::CurrentCountry;
use crate::shopify::{Product, ProductVariant, ShopifyError};
use crate::state::AppState;

/// Variant display data for templates.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: String,
    /// Numeric ID used in `?variant=`.
    pub legacy_id: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub available: bool,
    /// Highest quantity the add-to-cart form accepts.
    pub max_quantity: u32,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            legacy_id: variant.id.legacy_id().to_string(),
            title: variant.title.clone(),
            price: variant.price.display(),
            compare_at_price: variant
                .compare_at_price
                .as_ref()
                .filter(|compare| compare.amount > variant.price.amount)
                .map(saffron_core::Price::display),
            available: variant.available_for_sale,
            max_quantity: line_limit(variant.quantity_available),
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub description_html: String,
    pub images: Vec<ImageView>,
    pub variants: Vec<VariantView>,
    pub selected: Option<VariantView>,
    pub seo_title: String,
    pub seo_description: String,
}

impl ProductView {
    fn new(product: &Product, requested_variant: Option<&str>) -> Self {
        let mut images: Vec<ImageView> = product
            .images
            .nodes()
            .map(|image| ImageView::new(image, &product.title))
            .collect();
        if images.is_empty()
            && let Some(image) = &product.featured_image
        {
            images.push(ImageView::new(image, &product.title));
        }

        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            description_html: product.description_html.clone(),
            images,
            variants: product.variants.nodes().map(VariantView::from).collect(),
            selected: product
                .selected_variant(requested_variant)
                .map(VariantView::from),
            seo_title: product
                .seo
                .title
                .clone()
                .unwrap_or_else(|| product.title.clone()),
            seo_description: product
                .seo
                .description
                .clone()
                .unwrap_or_else(|| saffron_core::text::truncate(&product.description, 160)),
        }
    }

    /// Whether the product has a real choice of variants.
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.variants.len() > 1
    }
}

/// `?variant=` query parameter.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub variant: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
    pub wishlisted: bool,
}

/// Recommendations fragment template (HTMX, loaded after the page).
#[derive(Template, WebTemplate)]
#[template(path = "partials/recommendations.html")]
pub struct RecommendationsTemplate {
    pub products: Vec<ProductCardView>,
}

/// Display the product detail page.
///
/// # Errors
///
/// Returns 404 for unknown handles and a gateway error if Shopify fails.
#[instrument(skip(state, page, session))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    session: tower_sessions::Session,
    Path(handle): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Response, AppError> {
    let product = match state.storefront().get_product(&handle, &page.country).await {
        Ok(product) => product,
        Err(ShopifyError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("product {handle}")));
        }
        Err(e) => return Err(e.into()),
    };

    let view = ProductView::new(&product, query.variant.as_deref());
    let wishlisted = match &view.selected {
        Some(selected) => crate::services::wishlist::WishlistStore::new(&session)
            .load()
            .await
            .is_ok_and(|wishlist| wishlist.contains(&selected.id)),
        None => false,
    };

    Ok(ProductShowTemplate {
        page,
        product: view,
        wishlisted,
    }
    .into_response())
}

/// Product recommendations fragment.
///
/// Recommendations are optional; failures render an empty fragment.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    CurrentCountry(country): CurrentCountry,
    Path(handle): Path<String>,
) -> impl IntoResponse {
    let products = match state.storefront().get_product(&handle, &country).await {
        Ok(product) => state
            .storefront()
            .get_recommendations(&product.id, &country)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load recommendations");
                Vec::new()
            }),
        Err(e) => {
            tracing::debug!(error = %e, "No product for recommendations");
            Vec::new()
        }
    };

    RecommendationsTemplate {
        products: products
            .iter()
            .map(|product| ProductCardView::new(product, &country))
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product() -> Product {
        serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "handle": "masala-chai",
            "title": "Masala Chai",
            "description": "Spiced black tea.",
            "descriptionHtml": "<p>Spiced black tea.</p>",
            "vendor": "Saffron Lane",
            "availableForSale": true,
            "priceRange": {"minVariantPrice": {"amount": "12.0", "currencyCode": "USD"}},
            "variants": {"edges": [
                {"node": {
                    "id": "gid://shopify/ProductVariant/11",
                    "title": "100g",
                    "availableForSale": false,
                    "quantityAvailable": 0,
                    "price": {"amount": "12.0", "currencyCode": "USD"}
                }},
                {"node": {
                    "id": "gid://shopify/ProductVariant/12",
                    "title": "250g",
                    "availableForSale": true,
                    "quantityAvailable": 4,
                    "price": {"amount": "25.0", "currencyCode": "USD"},
                    "compareAtPrice": {"amount": "30.0", "currencyCode": "USD"}
                }}
            ], "pageInfo": {"hasNextPage": false}}
        }))
        .unwrap()
    }

    #[test]
    fn test_default_selection_is_first_available() {
        let view = ProductView::new(&product(), None);
        let selected = view.selected.as_ref().unwrap();
        assert_eq!(selected.legacy_id, "12");
        assert_eq!(selected.max_quantity, 4);
        assert_eq!(selected.compare_at_price.as_deref(), Some("$30.00"));
        assert!(view.has_options());
        assert_eq!(view.seo_title, "Masala Chai");
    }

    #[test]
    fn test_requested_variant_by_legacy_id() {
        let view = ProductView::new(&product(), Some("11"));
        let selected = view.selected.unwrap();
        assert_eq!(selected.title, "100g");
        assert!(!selected.available);
    }
}
