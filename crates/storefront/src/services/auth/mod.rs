//! Customer authentication.
//!
//! Two ways to sign in:
//! - OAuth against the Customer Account API (state and nonce kept in the
//!   session until the callback)
//! - Email and password through the Storefront API
//!   (`customerAccessTokenCreate`)
//!
//! Either way the result is a [`CustomerSession`] stored under
//! [`keys::CUSTOMER`].

mod error;

pub use error::AuthError;

use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::{CustomerSession, keys};
use crate::shopify::{CustomerAccessToken, CustomerClient, ShopifyError, StorefrontClient};

/// Path of the OAuth callback, relative to the base URL.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Fallback for codes not in [`USER_MESSAGES`].
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Upstream and local error codes with the message shown for each.
const USER_MESSAGES: &[(&str, &str)] = &[
    ("UNIDENTIFIED_CUSTOMER", "Incorrect email or password."),
    ("CUSTOMER_DISABLED", "This account has been disabled. Please contact us for help."),
    ("INVALID", "Please check your email and password."),
    ("BLANK", "Please enter your email and password."),
    ("TOO_SHORT", "Your password is too short."),
    ("NOT_FOUND", "We couldn't find an account with that email."),
    ("TOKEN_INVALID", "Your sign-in link has expired. Please sign in again."),
    ("THROTTLED", "Too many attempts. Please wait a moment and try again."),
    ("access_denied", "Sign-in was cancelled."),
    ("invalid_state", "Your sign-in attempt expired. Please try again."),
    ("missing_code", "Your sign-in attempt expired. Please try again."),
    ("not_logged_in", "Please sign in to continue."),
    ("session_expired", "Your session has expired. Please sign in again."),
];

/// User-facing message for an error code; unknown codes get a generic message.
#[must_use]
pub fn user_message(code: &str) -> &'static str {
    USER_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(GENERIC_MESSAGE, |(_, message)| message)
}

/// Generate a cryptographically secure random string.
#[must_use]
pub fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .filter_map(|_| CHARSET.get(rng.random_range(0..CHARSET.len())))
        .map(|&byte| char::from(byte))
        .collect()
}

/// Query parameters from the Shopify OAuth callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Authentication operations for one visitor.
pub struct AuthService<'a> {
    session: &'a Session,
    customer: &'a CustomerClient,
    storefront: &'a StorefrontClient,
    base_url: &'a str,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(
        session: &'a Session,
        customer: &'a CustomerClient,
        storefront: &'a StorefrontClient,
        base_url: &'a str,
    ) -> Self {
        Self {
            session,
            customer,
            storefront,
            base_url,
        }
    }

    fn redirect_uri(&self) -> String {
        format!("{}{CALLBACK_PATH}", self.base_url)
    }

    /// The signed-in customer, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current(&self) -> Result<Option<CustomerSession>, AuthError> {
        Ok(self.session.get(keys::CUSTOMER).await?)
    }

    /// Start OAuth: store state and nonce, return the authorization URL.
    ///
    /// `return_to` is a site-relative path to land on after the callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn begin_oauth(&self, return_to: Option<&str>) -> Result<String, AuthError> {
        let state = generate_random_string(32);
        let nonce = generate_random_string(32);

        self.session.insert(keys::OAUTH_STATE, &state).await?;
        self.session.insert(keys::OAUTH_NONCE, &nonce).await?;
        if let Some(path) = return_to.filter(|p| is_local_path(p)) {
            self.session.insert(keys::RETURN_TO, path).await?;
        }

        Ok(self
            .customer
            .authorization_url(&self.redirect_uri(), &state, &nonce))
    }

    /// Finish OAuth: validate state, exchange the code, store the tokens.
    ///
    /// Returns the path to redirect to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Denied`, `InvalidState` or `MissingCode` for a bad
    /// callback, or the token exchange error.
    #[instrument(skip_all)]
    pub async fn complete_oauth(&self, query: CallbackQuery) -> Result<String, AuthError> {
        if let Some(error) = query.error {
            tracing::warn!(
                error = %error,
                description = query.error_description.as_deref().unwrap_or_default(),
                "Shopify OAuth error"
            );
            return Err(AuthError::Denied(error));
        }

        let stored_state: Option<String> = self.session.remove(keys::OAUTH_STATE).await?;
        self.session.remove_value(keys::OAUTH_NONCE).await?;

        let Some(returned_state) = query.state else {
            return Err(AuthError::InvalidState);
        };
        if stored_state.as_deref() != Some(returned_state.as_str()) {
            tracing::warn!("Shopify OAuth state mismatch");
            return Err(AuthError::InvalidState);
        }

        let code = query.code.ok_or(AuthError::MissingCode)?;
        let token = self
            .customer
            .exchange_code(&code, &self.redirect_uri())
            .await?;

        self.store(CustomerSession::Oauth(token)).await?;
        tracing::info!("Customer authenticated via OAuth");

        let return_to: Option<String> = self.session.remove(keys::RETURN_TO).await?;
        Ok(return_to.unwrap_or_else(|| "/account".to_string()))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when Shopify does not
    /// recognize the pair, or any upstream/session error.
    #[instrument(skip_all)]
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let token = match self.storefront.create_customer_token(email, password).await {
            Ok(token) => token,
            Err(error) if error.user_error_code() == Some("UNIDENTIFIED_CUSTOMER") => {
                return Err(AuthError::InvalidCredentials);
            }
            Err(error) => return Err(error.into()),
        };

        self.store(CustomerSession::Classic {
            access_token: token.access_token,
            expires_at: token.expires_at,
        })
        .await?;
        tracing::info!("Customer authenticated with password");
        Ok(())
    }

    /// Refresh the OAuth access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without an OAuth session,
    /// `AuthError::SessionExpired` if there is no refresh token or Shopify
    /// rejects it.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<CustomerAccessToken, AuthError> {
        let Some(CustomerSession::Oauth(token)) = self.current().await? else {
            return Err(AuthError::NotLoggedIn);
        };
        let refresh_token = token.refresh_token.ok_or(AuthError::SessionExpired)?;

        match self.customer.refresh_token(&refresh_token).await {
            Ok(mut refreshed) => {
                // Shopify may omit tokens that did not rotate
                if refreshed.refresh_token.is_none() {
                    refreshed.refresh_token = Some(refresh_token);
                }
                if refreshed.id_token.is_none() {
                    refreshed.id_token = token.id_token;
                }
                self.store(CustomerSession::Oauth(refreshed.clone())).await?;
                Ok(refreshed)
            }
            Err(ShopifyError::OAuth(message)) => {
                tracing::warn!(error = %message, "Token refresh rejected");
                self.session.remove_value(keys::CUSTOMER).await?;
                Err(AuthError::SessionExpired)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Sign out. Returns where to send the browser next.
    ///
    /// OAuth sessions are sent through Shopify's logout endpoint; classic
    /// tokens are revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<String, AuthError> {
        let current: Option<CustomerSession> = self.session.remove(keys::CUSTOMER).await?;
        let home = format!("{}/", self.base_url);

        match current {
            Some(CustomerSession::Oauth(CustomerAccessToken {
                id_token: Some(id_token),
                ..
            })) => Ok(self.customer.logout_url(&id_token, &home)),
            Some(CustomerSession::Classic { access_token, .. }) => {
                if let Err(e) = self.storefront.delete_customer_token(&access_token).await {
                    tracing::warn!(error = %e, "Failed to revoke customer token");
                }
                Ok("/".to_string())
            }
            _ => Ok("/".to_string()),
        }
    }

    async fn store(&self, customer: CustomerSession) -> Result<(), AuthError> {
        // New privilege level, new session ID
        self.session.cycle_id().await?;
        self.session.insert(keys::CUSTOMER, customer).await?;
        Ok(())
    }
}

/// Site-relative path without a scheme or host.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_table_and_fallback() {
        assert_eq!(user_message("UNIDENTIFIED_CUSTOMER"), "Incorrect email or password.");
        assert_eq!(user_message("invalid_state"), "Your sign-in attempt expired. Please try again.");
        assert_eq!(user_message("SOMETHING_NEW"), GENERIC_MESSAGE);
        assert_eq!(user_message(""), GENERIC_MESSAGE);
    }

    #[test]
    fn test_error_codes_map_through_table() {
        assert_eq!(AuthError::InvalidCredentials.user_message(), "Incorrect email or password.");
        assert_eq!(
            AuthError::Shopify(ShopifyError::RateLimited(3)).user_message(),
            "Too many attempts. Please wait a moment and try again."
        );
        assert_eq!(
            AuthError::Shopify(ShopifyError::NotFound("x".to_string())).user_message(),
            GENERIC_MESSAGE
        );
    }

    #[test]
    fn test_random_string() {
        let a = generate_random_string(32);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, generate_random_string(32));
    }

    #[test]
    fn test_return_to_must_be_local() {
        assert!(is_local_path("/in/account/orders"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("https://evil.example"));
    }
}
