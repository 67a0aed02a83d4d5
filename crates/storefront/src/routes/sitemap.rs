//! `sitemap.xml` and `robots.txt`.
//!
//! The sitemap lists every page under every country segment, so each
//! localized URL is crawlable.

use std::fmt::Write as _;

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use saffron_core::{COUNTRIES, Country};
use tracing::instrument;

use crate::error::AppError;
use crate::shopify::HandleEntry;
use crate::state::AppState;

/// Static pages listed for each country.
const STATIC_PATHS: &[&str] = &["", "/collections", "/search"];

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    let _ = write!(xml, "  <url><loc>{}</loc>", escape_xml(loc));
    if let Some(date) = lastmod.and_then(|value| value.get(..10)) {
        let _ = write!(xml, "<lastmod>{date}</lastmod>");
    }
    xml.push_str("</url>\n");
}

/// Render the sitemap document.
#[must_use]
pub fn render(
    base_url: &str,
    countries: &[Country],
    products: &[HandleEntry],
    collections: &[HandleEntry],
) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for country in countries {
        for path in STATIC_PATHS {
            push_url(&mut xml, &format!("{base_url}{}", country.path(path)), None);
        }
        for (prefix, entries) in [("/collections", collections), ("/products", products)] {
            for entry in entries {
                let path = country.path(&format!("{prefix}/{}", entry.handle));
                push_url(&mut xml, &format!("{base_url}{path}"), entry.updated_at.as_deref());
            }
        }
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Serve `sitemap.xml`.
///
/// # Errors
///
/// Returns a gateway error if the catalog cannot be listed.
#[instrument(skip_all)]
pub async fn sitemap(State(state): State<AppState>) -> Result<Response, AppError> {
    let (products, collections) = state.storefront().get_sitemap_entries().await?;
    let xml = render(&state.config().base_url, COUNTRIES, &products, &collections);
    Ok(([(CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response())
}

/// Serve `robots.txt`.
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\n\
         Disallow: /cart\n\
         Disallow: /account\n\
         Disallow: /auth\n\
         Disallow: /api\n\
         Sitemap: {}/sitemap.xml\n",
        state.config().base_url
    );
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_country() {
        let products = vec![HandleEntry {
            handle: "kashmiri-saffron".to_string(),
            updated_at: Some("2026-09-01T08:00:00Z".to_string()),
        }];
        let collections = vec![HandleEntry {
            handle: "spices & teas".to_string(),
            updated_at: None,
        }];
        let countries: Vec<Country> = ["in", "gb"].iter().filter_map(|s| Country::from_slug(s)).collect();

        let xml = render("https://saffronlane.test", &countries, &products, &collections);

        assert!(xml.contains("<loc>https://saffronlane.test/in</loc>"));
        assert!(xml.contains(
            "<loc>https://saffronlane.test/gb/products/kashmiri-saffron</loc><lastmod>2026-09-01</lastmod>"
        ));
        assert!(xml.contains("/in/collections/spices &amp; teas"));
        assert_eq!(xml.matches("<url>").count(), 2 * (STATIC_PATHS.len() + 2));
    }
}
