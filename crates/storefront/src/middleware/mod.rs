//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Country (resolve country, strip or redirect the URL segment); wraps the
//!    router so routing sees the stripped path
//! 2. Sentry layers (hub per request, HTTP context)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. CSP nonce (generate per-request nonce for inline scripts)
//! 6. Security headers (CSP, frame, referrer, etc.)
//! 7. Session layer (tower-sessions, Postgres or memory store)
//! 8. Rate limiting (governor) on auth and cart routes

pub mod country;
pub mod csp;
pub mod customer;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use country::{CurrentCountry, country_middleware};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use customer::{OptionalCustomer, RequireCustomer};
pub use rate_limit::{auth_rate_limiter, cart_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
