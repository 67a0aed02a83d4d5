//! Authentication route handlers.
//!
//! Customers sign in either through the Customer Account API (OAuth) or with
//! email and password against the Storefront API. Failures land back on the
//! login page with an `?error=` code that maps to a readable message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::context::PageContext;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::models::CustomerSession;
use crate::services::auth::{AuthError, AuthService, CallbackQuery, user_message};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub return_to: Option<String>,
}

/// `?error=&return_to=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub return_to: Option<String>,
}

/// `?return_to=` for starting OAuth.
#[derive(Debug, Default, Deserialize)]
pub struct OauthQuery {
    pub return_to: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub error: Option<&'static str>,
    pub return_to: String,
    pub oauth_href: String,
}

/// Site-relative path safe to redirect to, else `/account`.
fn safe_return_to(return_to: Option<&str>) -> String {
    return_to
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .unwrap_or("/account")
        .to_string()
}

fn login_redirect(error: &AuthError, return_to: Option<&str>) -> Response {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", error.code());
    if let Some(return_to) = return_to {
        query.append_pair("return_to", return_to);
    }
    Redirect::to(&format!("/auth/login?{}", query.finish())).into_response()
}

fn auth<'a>(state: &'a AppState, session: &'a Session) -> AuthService<'a> {
    AuthService::new(
        session,
        state.customer(),
        state.storefront(),
        &state.config().base_url,
    )
}

/// Display the login page.
pub async fn login_page(page: PageContext, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let return_to = safe_return_to(query.return_to.as_deref());
    LoginTemplate {
        error: query.error.as_deref().map(user_message),
        oauth_href: format!("/auth/oauth?return_to={}", urlencoding::encode(&return_to)),
        return_to,
        page,
    }
}

/// Handle the email and password form.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let return_to = safe_return_to(form.return_to.as_deref());
    let auth = auth(&state, &session);

    if let Err(e) = auth.login_with_password(&form.email, &form.password).await {
        tracing::info!(code = e.code(), "Password login failed");
        return login_redirect(&e, Some(&return_to));
    }

    if let Ok(Some(CustomerSession::Classic { access_token, .. })) = auth.current().await {
        match state.storefront().get_customer_by_token(&access_token).await {
            Ok(customer) => set_sentry_user(&customer.id, customer.email.as_deref()),
            Err(e) => tracing::warn!(error = %e, "Failed to load customer after login"),
        }
    }

    Redirect::to(&return_to).into_response()
}

/// Start the Customer Account OAuth flow.
#[instrument(skip_all)]
pub async fn oauth_start(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OauthQuery>,
) -> Response {
    let return_to = safe_return_to(query.return_to.as_deref());
    match auth(&state, &session).begin_oauth(Some(&return_to)).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to start OAuth");
            login_redirect(&e, Some(&return_to))
        }
    }
}

/// Handle the OAuth callback from Shopify.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let auth = auth(&state, &session);
    let destination = match auth.complete_oauth(query).await {
        Ok(destination) => destination,
        Err(e) => {
            tracing::warn!(error = %e, "OAuth callback rejected");
            return login_redirect(&e, None);
        }
    };

    if let Ok(Some(CustomerSession::Oauth(token))) = auth.current().await {
        match state.customer().get_customer(&token.access_token).await {
            Ok(customer) => set_sentry_user(&customer.id, customer.email()),
            Err(e) => tracing::warn!(error = %e, "Failed to load customer after OAuth"),
        }
    }

    Redirect::to(&destination).into_response()
}

/// Refresh the OAuth access token.
///
/// # Errors
///
/// Returns 401 when there is no OAuth session or Shopify rejects the
/// refresh token.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    auth(&state, &session).refresh().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sign out and send the browser to the right place (Shopify logout for
/// OAuth customers).
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let destination = match auth(&state, &session).logout().await {
        Ok(destination) => destination,
        Err(e) => {
            tracing::error!(error = %e, "Logout failed");
            "/".to_string()
        }
    };
    clear_sentry_user();
    Redirect::to(&destination).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_return_to_must_be_local() {
        assert_eq!(safe_return_to(Some("/in/account/orders")), "/in/account/orders");
        assert_eq!(safe_return_to(Some("//evil.example")), "/account");
        assert_eq!(safe_return_to(Some("https://evil.example")), "/account");
        assert_eq!(safe_return_to(None), "/account");
    }

    #[test]
    fn test_login_redirect_carries_error_code() {
        let response = login_redirect(&AuthError::InvalidCredentials, Some("/gb/cart"));
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/login?error=UNIDENTIFIED_CUSTOMER&return_to=%2Fgb%2Fcart")
        );
    }
}
