//! JSON endpoints for client-side scripts.
//!
//! Mounted under `/api`, outside the country segment; the cart endpoint
//! takes the country as `?country=` instead.

use axum::{
    Json,
    extract::{Query, State},
};
use saffron_core::Country;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{CurrentCountry, RequireCustomer};
use crate::models::CustomerSession;
use crate::services::cart::{CartService, CartSnapshot};
use crate::state::AppState;

/// `?country=` slug for the cart endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    pub country: Option<String>,
}

/// Signed-in customer summary.
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub id: String,
    pub email: Option<String>,
    pub name: String,
    /// `oauth` or `classic`.
    pub kind: &'static str,
}

/// The local cart snapshot for a country.
///
/// # Errors
///
/// Returns 400 for an unknown country or an error if the session fails.
#[instrument(skip_all)]
pub async fn cart(
    State(state): State<AppState>,
    session: Session,
    CurrentCountry(detected): CurrentCountry,
    Query(query): Query<CartQuery>,
) -> Result<Json<CartSnapshot>, AppError> {
    let country = match query.country.as_deref() {
        Some(slug) => Country::from_slug(slug)
            .ok_or_else(|| AppError::BadRequest(format!("unknown country: {slug}")))?,
        None => detected,
    };

    let snapshot = CartService::new(state.storefront(), &session, state.cipher(), country)
        .load()
        .await?;
    Ok(Json(snapshot))
}

/// The signed-in customer's profile.
///
/// # Errors
///
/// Returns 401 when signed out or the token is rejected.
#[instrument(skip_all)]
pub async fn customer(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<CustomerSummary>, AppError> {
    let summary = match &customer {
        CustomerSession::Oauth(token) => {
            let customer = state.customer().get_customer(&token.access_token).await?;
            CustomerSummary {
                name: customer.display_name(),
                email: customer.email().map(String::from),
                id: customer.id,
                kind: "oauth",
            }
        }
        CustomerSession::Classic { access_token, .. } => {
            let customer = state.storefront().get_customer_by_token(access_token).await?;
            let name = [customer.first_name.as_deref(), customer.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            CustomerSummary {
                name,
                email: customer.email,
                id: customer.id,
                kind: "classic",
            }
        }
    };
    Ok(Json(summary))
}
