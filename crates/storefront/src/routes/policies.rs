//! Shop policy pages (privacy, refund, shipping, terms).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use saffron_core::text::title_or_slug;
use tracing::instrument;

use super::context::PageContext;
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Policy page template.
#[derive(Template, WebTemplate)]
#[template(path = "policies/show.html")]
pub struct PolicyTemplate {
    pub page: PageContext,
    pub title: String,
    /// HTML body from Shopify.
    pub body: String,
}

/// Display a policy by handle (e.g. `refund-policy`).
///
/// # Errors
///
/// Returns 404 for unknown handles and a gateway error if Shopify fails.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(handle): Path<String>,
) -> Result<Response, AppError> {
    let policy = state
        .storefront()
        .get_policies()
        .await?
        .into_iter()
        .find(|policy| policy.handle == handle)
        .ok_or_else(|| AppError::NotFound(format!("policy {handle}")))?;

    Ok(PolicyTemplate {
        page,
        title: title_or_slug(&policy.title, &handle),
        body: policy.body,
    }
    .into_response())
}
