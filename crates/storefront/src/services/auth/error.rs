//! Authentication error types.

use thiserror::Error;

use crate::shopify::ShopifyError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Shopify rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email or password missing from the form.
    #[error("email and password are required")]
    MissingCredentials,

    /// Shopify returned an OAuth error to the callback.
    #[error("authorization denied: {0}")]
    Denied(String),

    /// Callback state missing or not the one we issued.
    #[error("invalid OAuth state")]
    InvalidState,

    /// Callback arrived without an authorization code.
    #[error("missing authorization code")]
    MissingCode,

    /// No customer in the session.
    #[error("not logged in")]
    NotLoggedIn,

    /// The session has no refresh token, or Shopify rejected it.
    #[error("session expired")]
    SessionExpired,

    /// Session state could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Upstream request failed.
    #[error("shopify error: {0}")]
    Shopify(#[from] ShopifyError),
}

impl AuthError {
    /// Machine-readable code, passed through `?error=` to the login page.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidCredentials => "UNIDENTIFIED_CUSTOMER",
            Self::MissingCredentials => "BLANK",
            Self::Denied(_) => "access_denied",
            Self::InvalidState => "invalid_state",
            Self::MissingCode => "missing_code",
            Self::NotLoggedIn => "not_logged_in",
            Self::SessionExpired => "session_expired",
            Self::Session(_) => "session",
            Self::Shopify(ShopifyError::RateLimited(_)) => "THROTTLED",
            Self::Shopify(error) => error.user_error_code().unwrap_or("upstream"),
        }
    }

    /// Message shown on the login page.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        super::user_message(self.code())
    }
}
