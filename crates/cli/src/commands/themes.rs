//! Seasonal theme and country inspection.
//!
//! # Usage
//!
//! ```bash
//! saffron-cli themes                      # today, every country
//! saffron-cli themes -d 2026-11-28 -c in  # one country on a date
//! saffron-cli themes --all                # the whole table
//! saffron-cli countries
//! ```

use chrono::{NaiveDate, Utc};
use saffron_core::theme::{CalendarDate, THEMES, active_theme};
use saffron_core::{COUNTRIES, Country};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Unknown country: {0}")]
    UnknownCountry(String),
}

/// One output line: `slug  theme (banner)` or `slug  -`.
fn describe(country: &Country, today: CalendarDate) -> String {
    match active_theme(today, country.code) {
        Some(theme) => format!("{:<4}{} ({})", country.slug, theme.name, theme.banner),
        None => format!("{:<4}-", country.slug),
    }
}

/// Print the active theme for each country (or one) on `date`.
///
/// # Errors
///
/// Returns an error if `country` is not a supported slug.
pub fn active(date: Option<NaiveDate>, country: Option<&str>) -> Result<(), ThemeError> {
    let today = CalendarDate::from(date.unwrap_or_else(|| Utc::now().date_naive()));

    let countries: Vec<Country> = match country {
        Some(slug) => vec![
            Country::from_slug(slug).ok_or_else(|| ThemeError::UnknownCountry(slug.to_string()))?,
        ],
        None => COUNTRIES.to_vec(),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("Themes on {today}:");
        for country in &countries {
            println!("  {}", describe(country, today));
        }
    }
    Ok(())
}

/// Print the theme table in priority order.
#[allow(clippy::print_stdout)]
pub fn table() {
    for theme in THEMES {
        let reach = if theme.global {
            format!("global except {:?}", theme.excluded_countries)
        } else {
            format!("{:?}", theme.countries)
        };
        println!(
            "{:<20}{} to {}  {reach}",
            theme.id, theme.start, theme.end
        );
    }
}

/// Print supported countries.
#[allow(clippy::print_stdout)]
pub fn countries() {
    for country in COUNTRIES {
        println!(
            "{:<4}{:<4}{:<5}{}",
            country.slug, country.code, country.currency, country.name
        );
    }
}
