//! Customer authentication extractors.
//!
//! Provides extractors for requiring a signed-in customer in route handlers.
//! Expired OAuth tokens are refreshed transparently before the handler runs.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use saffron_core::Country;
use tower_sessions::Session;

use crate::middleware::country;
use crate::models::{CustomerSession, keys};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Extractor that requires a signed-in customer.
///
/// HTML requests without a customer are redirected to the login page; API
/// requests get a 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn account(RequireCustomer(customer): RequireCustomer) -> impl IntoResponse {
///     match customer.oauth() {
///         Some(token) => { /* Customer Account API calls */ }
///         None => { /* credentials login */ }
///     }
/// }
/// ```
pub struct RequireCustomer(pub CustomerSession);

/// Error returned when a customer is required but not present.
pub enum CustomerRejection {
    /// Redirect to the login page (for HTML requests).
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for CustomerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(location) => Redirect::to(&location).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Path as the client sent it, before nesting and the country rewrite.
fn requested_path(parts: &Parts) -> String {
    match parts.extensions.get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_string(),
        None if country::is_exempt(parts.uri.path()) => parts.uri.path().to_string(),
        None => {
            let country = parts.extensions.get::<Country>().copied().unwrap_or_default();
            country.path(parts.uri.path())
        }
    }
}

/// Login URL that returns to the current page afterwards.
fn login_location(parts: &Parts, error: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("return_to", &requested_path(parts));
    if let Some(error) = error {
        query.append_pair("error", error);
    }
    format!("/auth/login?{}", query.finish())
}

fn reject(parts: &Parts, error: Option<&str>) -> CustomerRejection {
    if requested_path(parts).starts_with("/api/") {
        CustomerRejection::Unauthorized
    } else {
        CustomerRejection::RedirectToLogin(login_location(parts, error))
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CustomerRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(CustomerRejection::Unauthorized)?;

        let customer: CustomerSession = session
            .get(keys::CUSTOMER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| reject(parts, None))?;

        if !customer.is_expired() {
            return Ok(Self(customer));
        }

        match customer {
            CustomerSession::Oauth(_) => {
                let state = AppState::from_ref(state);
                let auth = AuthService::new(
                    &session,
                    state.customer(),
                    state.storefront(),
                    &state.config().base_url,
                );
                match auth.refresh().await {
                    Ok(token) => {
                        tracing::debug!("Refreshed expired customer access token");
                        Ok(Self(CustomerSession::Oauth(token)))
                    }
                    Err(e) => {
                        tracing::info!(error = %e, "Customer token refresh failed");
                        Err(reject(parts, Some(e.code())))
                    }
                }
            }
            CustomerSession::Classic { .. } => {
                if let Err(e) = session.remove_value(keys::CUSTOMER).await {
                    tracing::warn!(error = %e, "Failed to drop expired customer token");
                }
                Err(reject(parts, Some("session_expired")))
            }
        }
    }
}

/// Extractor that optionally gets the signed-in customer.
///
/// Unlike `RequireCustomer`, this never rejects and never refreshes; an
/// expired session reads as signed out.
pub struct OptionalCustomer(pub Option<CustomerSession>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let customer = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CustomerSession>(keys::CUSTOMER)
                .await
                .ok()
                .flatten()
                .filter(|customer| !customer.is_expired()),
            None => None,
        };

        Ok(Self(customer))
    }
}
