//! Country resolution middleware.
//!
//! Storefront pages live under a country segment (`/in/products/chai`). The
//! middleware resolves the visitor's country from, in order:
//!
//! 1. the first path segment
//! 2. the `country` cookie
//! 3. a geo-IP header set by the edge (`cf-ipcountry`, ...)
//! 4. the configured default
//!
//! A recognized segment is stripped before routing so handlers match on
//! `/products/chai` and read the [`Country`] from request extensions. A
//! missing or unknown segment gets a 307 to the resolved country's path.
//!
//! This layer must wrap the whole router (not `Router::layer`) so the rewritten
//! URI is what the router matches against.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode, Uri,
        header::{COOKIE, LOCATION, SET_COOKIE},
        request::Parts,
        uri::PathAndQuery,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use saffron_core::Country;
use tower_sessions::cookie::{Cookie, SameSite};

use crate::state::AppState;

/// Cookie holding the country slug.
pub const COUNTRY_COOKIE: &str = "country";

/// Cookie holding the country display name.
pub const COUNTRY_NAME_COOKIE: &str = "country_name";

/// Edge headers carrying the visitor's ISO country code, first present wins.
pub const GEO_HEADERS: &[&str] = &["cf-ipcountry", "x-vercel-ip-country", "fly-client-country"];

/// Path prefixes served without a country segment.
const EXEMPT_PREFIXES: &[&str] = &["/static", "/health", "/api", "/auth"];

/// Exact paths served without a country segment.
const EXEMPT_PATHS: &[&str] = &["/sitemap.xml", "/robots.txt", "/favicon.ico"];

/// Country cookie lifetime (one year).
const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Whether `path` bypasses the country segment.
#[must_use]
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path)
        || EXEMPT_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
}

/// Split `/in/products/chai` into the country and the remaining path.
#[must_use]
pub fn split_country_segment(path: &str) -> Option<(Country, &str)> {
    let trimmed = path.strip_prefix('/')?;
    let (segment, rest) = trimmed
        .find('/')
        .map_or((trimmed, ""), |idx| trimmed.split_at(idx));
    let country = Country::from_slug(segment)?;
    Some((country, rest))
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<Cookie<'a>> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
}

/// Country from the `country` cookie, if it names a known country.
#[must_use]
pub fn from_cookie(headers: &HeaderMap) -> Option<Country> {
    cookie_value(headers, COUNTRY_COOKIE).and_then(|cookie| Country::from_slug(cookie.value()))
}

/// Country from the first geo-IP header that names a known country.
#[must_use]
pub fn from_geo_headers(headers: &HeaderMap) -> Option<Country> {
    GEO_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .and_then(Country::from_code)
    })
}

/// Resolve a country without looking at the path: cookie, geo header, default.
#[must_use]
pub fn detect(headers: &HeaderMap, default: Country) -> Country {
    from_cookie(headers)
        .or_else(|| from_geo_headers(headers))
        .unwrap_or(default)
}

fn country_cookies(country: &Country, secure: bool) -> [Cookie<'static>; 2] {
    let build = |name: &'static str, value: &'static str| {
        Cookie::build((name, value))
            .path("/")
            .same_site(SameSite::Lax)
            .secure(secure)
            .max_age(tower_sessions::cookie::time::Duration::days(COOKIE_MAX_AGE_DAYS))
            .build()
    };
    [
        build(COUNTRY_COOKIE, country.slug),
        build(COUNTRY_NAME_COOKIE, country.name),
    ]
}

fn append_cookies(response: &mut Response, country: &Country, secure: bool) {
    for cookie in country_cookies(country, secure) {
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
}

fn rewrite_uri(uri: &Uri, path: &str) -> Option<Uri> {
    let path = if path.is_empty() { "/" } else { path };
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

fn redirect_location(country: &Country, uri: &Uri) -> String {
    // An unknown two-letter segment is treated as a bad country, not a page
    let path = uri.path();
    let rest = path
        .strip_prefix('/')
        .and_then(|trimmed| {
            let (segment, rest) = trimmed
                .find('/')
                .map_or((trimmed, ""), |idx| trimmed.split_at(idx));
            (segment.len() == 2 && segment.chars().all(|c| c.is_ascii_alphabetic()))
                .then_some(rest)
        })
        .unwrap_or(path);

    let mut location = country.path(rest);
    if let Some(query) = uri.query() {
        location.push('?');
        location.push_str(query);
    }
    location
}

/// Resolve the country and rewrite or redirect the request.
pub async fn country_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let default = state.config().default_country;
    let secure = state.config().is_secure();
    let path = request.uri().path().to_string();

    if is_exempt(&path) {
        let country = detect(request.headers(), default);
        request.extensions_mut().insert(country);
        return next.run(request).await;
    }

    if let Some((country, rest)) = split_country_segment(&path) {
        let cookie_matches = from_cookie(request.headers()) == Some(country);
        if let Some(uri) = rewrite_uri(request.uri(), rest) {
            *request.uri_mut() = uri;
        }
        request.extensions_mut().insert(country);

        let mut response = next.run(request).await;
        if !cookie_matches {
            append_cookies(&mut response, &country, secure);
        }
        return response;
    }

    let country = detect(request.headers(), default);
    let location = redirect_location(&country, request.uri());
    tracing::debug!(from = %path, to = %location, "Redirecting to country path");

    let mut response = match HeaderValue::from_str(&location) {
        Ok(location) => (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    };
    append_cookies(&mut response, &country, secure);
    response
}

/// Extractor for the country resolved by [`country_middleware`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentCountry(pub Country);

impl<S> FromRequestParts<S> for CurrentCountry
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Country>().copied().unwrap_or_else(|| {
            tracing::warn!(
                "Country not found in request extensions - middleware may be misconfigured"
            );
            Country::default()
        })))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/static/css/main.css"));
        assert!(is_exempt("/health"));
        assert!(is_exempt("/api/cart"));
        assert!(is_exempt("/auth/callback"));
        assert!(is_exempt("/sitemap.xml"));
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/apiary"));
        assert!(!is_exempt("/products/chai"));
    }

    #[test]
    fn test_split_country_segment() {
        let (country, rest) = split_country_segment("/in/products/chai").unwrap();
        assert_eq!(country.code, "IN");
        assert_eq!(rest, "/products/chai");

        let (country, rest) = split_country_segment("/GB").unwrap();
        assert_eq!(country.slug, "gb");
        assert_eq!(rest, "");

        assert!(split_country_segment("/products/chai").is_none());
        assert!(split_country_segment("/zz/products").is_none());
    }

    #[test]
    fn test_resolution_order() {
        let default = Country::default();

        let both = headers(&[("cookie", "theme=dark; country=jp"), ("cf-ipcountry", "IN")]);
        assert_eq!(detect(&both, default).slug, "jp");

        let geo_only = headers(&[("x-vercel-ip-country", "gb")]);
        assert_eq!(detect(&geo_only, default).slug, "gb");

        let unknown = headers(&[("cookie", "country=zz"), ("cf-ipcountry", "XX")]);
        assert_eq!(detect(&unknown, default), default);
    }

    #[test]
    fn test_rewrite_keeps_query() {
        let uri: Uri = "/in/search?q=chai".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/search").unwrap();
        assert_eq!(rewritten.to_string(), "/search?q=chai");

        let root: Uri = "/in".parse().unwrap();
        assert_eq!(rewrite_uri(&root, "").unwrap().path(), "/");
    }

    #[test]
    fn test_redirect_location() {
        let india = Country::from_slug("in").unwrap();
        let uri: Uri = "/products/chai?variant=1".parse().unwrap();
        assert_eq!(redirect_location(&india, &uri), "/in/products/chai?variant=1");

        let bad: Uri = "/zz/collections".parse().unwrap();
        assert_eq!(redirect_location(&india, &bad), "/in/collections");

        let root: Uri = "/".parse().unwrap();
        assert_eq!(redirect_location(&india, &root), "/in");
    }

    #[test]
    fn test_country_cookies() {
        let gb = Country::from_slug("gb").unwrap();
        let [slug, name] = country_cookies(&gb, true);
        assert_eq!(slug.value(), "gb");
        assert_eq!(name.name(), COUNTRY_NAME_COOKIE);
        assert_eq!(slug.secure(), Some(true));
    }
}
