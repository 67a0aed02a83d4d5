//! Seasonal theme selection.
//!
//! A theme decorates every page with a banner and an accent palette. Themes
//! live in a static table ordered by priority; for a given date and country
//! the first matching entry wins.
//!
//! A theme matches when:
//! - the date is inside `[start, end]` (both inclusive), and
//! - the country is listed in `countries`, or the theme is `global` and the
//!   country is not listed in `excluded_countries`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A calendar date without time zone, comparable in chronological order.
///
/// Field order matters: the derived `Ord` compares year, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// What kind of occasion a theme marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Festival,
    Season,
    Promotion,
}

/// One row of the theme table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ThemeKind,
    pub start: CalendarDate,
    pub end: CalendarDate,
    /// ISO country codes the theme targets explicitly.
    pub countries: &'static [&'static str],
    /// Applies to every country not in `excluded_countries`.
    pub global: bool,
    pub excluded_countries: &'static [&'static str],
    /// Banner text shown above the header.
    pub banner: &'static str,
    /// CSS class added to `<body>`.
    pub palette: &'static str,
}

impl Theme {
    /// Whether `today` falls inside the theme's window, ends included.
    #[must_use]
    pub fn is_live_on(&self, today: CalendarDate) -> bool {
        self.start <= today && today <= self.end
    }

    /// Whether the theme targets the given ISO country code.
    #[must_use]
    pub fn applies_to(&self, country_code: &str) -> bool {
        let listed = |codes: &[&str]| codes.iter().any(|c| c.eq_ignore_ascii_case(country_code));
        listed(self.countries) || (self.global && !listed(self.excluded_countries))
    }
}

/// Pick the first theme in `table` that is live on `today` for `country_code`.
#[must_use]
pub fn select_theme<'a>(
    table: &'a [Theme],
    today: CalendarDate,
    country_code: &str,
) -> Option<&'a Theme> {
    table
        .iter()
        .find(|theme| theme.is_live_on(today) && theme.applies_to(country_code))
}

/// Pick the active theme from the built-in table.
#[must_use]
pub fn active_theme(today: CalendarDate, country_code: &str) -> Option<&'static Theme> {
    select_theme(THEMES, today, country_code)
}

/// Built-in themes, highest priority first.
pub const THEMES: &[Theme] = &[
    Theme {
        id: "diwali-2026",
        name: "Diwali",
        kind: ThemeKind::Festival,
        start: CalendarDate::new(2026, 10, 30),
        end: CalendarDate::new(2026, 11, 12),
        countries: &["IN", "SG", "AE", "GB"],
        global: false,
        excluded_countries: &[],
        banner: "Happy Diwali! Festive gift boxes are here.",
        palette: "theme-diwali",
    },
    Theme {
        id: "black-friday-2026",
        name: "Black Friday",
        kind: ThemeKind::Promotion,
        start: CalendarDate::new(2026, 11, 27),
        end: CalendarDate::new(2026, 11, 30),
        countries: &[],
        global: true,
        excluded_countries: &["IN", "AE"],
        banner: "Black Friday: our biggest sale of the year.",
        palette: "theme-black-friday",
    },
    Theme {
        id: "holidays-2026",
        name: "Holidays",
        kind: ThemeKind::Festival,
        start: CalendarDate::new(2026, 12, 1),
        end: CalendarDate::new(2026, 12, 31),
        countries: &[],
        global: true,
        excluded_countries: &["AE"],
        banner: "Season's greetings. Order by Dec 18 for holiday delivery.",
        palette: "theme-holidays",
    },
    Theme {
        id: "lunar-new-year-2027",
        name: "Lunar New Year",
        kind: ThemeKind::Festival,
        start: CalendarDate::new(2027, 2, 1),
        end: CalendarDate::new(2027, 2, 15),
        countries: &["SG"],
        global: false,
        excluded_countries: &[],
        banner: "Gong Xi Fa Cai! Celebrate the Year of the Goat.",
        palette: "theme-lunar",
    },
    Theme {
        id: "holi-2027",
        name: "Holi",
        kind: ThemeKind::Festival,
        start: CalendarDate::new(2027, 3, 18),
        end: CalendarDate::new(2027, 3, 23),
        countries: &["IN"],
        global: false,
        excluded_countries: &[],
        banner: "Happy Holi! Colour your kitchen with new blends.",
        palette: "theme-holi",
    },
    Theme {
        id: "summer-2027",
        name: "Summer",
        kind: ThemeKind::Season,
        start: CalendarDate::new(2027, 6, 1),
        end: CalendarDate::new(2027, 8, 31),
        countries: &[],
        global: true,
        excluded_countries: &["AU", "IN", "SG"],
        banner: "Summer blends for iced chai and cold brew.",
        palette: "theme-summer",
    },
    Theme {
        id: "winter-2026",
        name: "Winter",
        kind: ThemeKind::Season,
        start: CalendarDate::new(2026, 12, 1),
        end: CalendarDate::new(2027, 2, 28),
        countries: &[],
        global: true,
        excluded_countries: &["AU", "SG", "AE", "IN"],
        banner: "Warm up with our winter spice collection.",
        palette: "theme-winter",
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const fn theme(
        id: &'static str,
        start: CalendarDate,
        end: CalendarDate,
        countries: &'static [&'static str],
        global: bool,
        excluded_countries: &'static [&'static str],
    ) -> Theme {
        Theme {
            id,
            name: id,
            kind: ThemeKind::Promotion,
            start,
            end,
            countries,
            global,
            excluded_countries,
            banner: "",
            palette: "",
        }
    }

    const D: fn(i32, u32, u32) -> CalendarDate = CalendarDate::new;

    #[test]
    fn test_first_match_wins() {
        let table = [
            theme("a", D(2026, 1, 1), D(2026, 1, 31), &["US"], false, &[]),
            theme("b", D(2026, 1, 1), D(2026, 12, 31), &[], true, &[]),
        ];
        let picked = select_theme(&table, D(2026, 1, 15), "US").unwrap();
        assert_eq!(picked.id, "a");
        let picked = select_theme(&table, D(2026, 1, 15), "GB").unwrap();
        assert_eq!(picked.id, "b");
    }

    #[test]
    fn test_range_is_inclusive() {
        let table = [theme("a", D(2026, 3, 1), D(2026, 3, 5), &["IN"], false, &[])];
        assert!(select_theme(&table, D(2026, 3, 1), "IN").is_some());
        assert!(select_theme(&table, D(2026, 3, 5), "IN").is_some());
        assert!(select_theme(&table, D(2026, 2, 28), "IN").is_none());
        assert!(select_theme(&table, D(2026, 3, 6), "IN").is_none());
    }

    #[test]
    fn test_global_theme_suppressed_for_excluded_country() {
        let table = [theme("g", D(2026, 1, 1), D(2026, 1, 31), &[], true, &["AE"])];
        assert!(select_theme(&table, D(2026, 1, 10), "US").is_some());
        assert!(select_theme(&table, D(2026, 1, 10), "AE").is_none());
        assert!(select_theme(&table, D(2026, 1, 10), "ae").is_none());
    }

    #[test]
    fn test_explicit_listing_beats_exclusion() {
        let table = [theme("x", D(2026, 1, 1), D(2026, 1, 31), &["AE"], true, &["AE"])];
        assert!(select_theme(&table, D(2026, 1, 10), "AE").is_some());
    }

    #[test]
    fn test_non_global_requires_listing() {
        let table = [theme("n", D(2026, 1, 1), D(2026, 1, 31), &["IN"], false, &[])];
        assert!(select_theme(&table, D(2026, 1, 10), "US").is_none());
    }

    #[test]
    fn test_disjoint_ranges_yield_single_theme() {
        let table = [
            theme("a", D(2026, 1, 1), D(2026, 1, 31), &[], true, &[]),
            theme("b", D(2026, 2, 1), D(2026, 2, 28), &[], true, &[]),
            theme("c", D(2026, 3, 1), D(2026, 3, 31), &[], true, &[]),
        ];
        let mut day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        while day <= NaiveDate::from_ymd_opt(2026, 3, 31).unwrap() {
            let today = CalendarDate::from(day);
            let live: Vec<_> = table
                .iter()
                .filter(|t| t.is_live_on(today) && t.applies_to("US"))
                .collect();
            assert_eq!(live.len(), 1, "{today}");
            assert_eq!(select_theme(&table, today, "US").unwrap().id, live[0].id);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_builtin_table() {
        let diwali = active_theme(D(2026, 11, 1), "IN").unwrap();
        assert_eq!(diwali.id, "diwali-2026");
        assert!(active_theme(D(2026, 11, 1), "US").is_none());

        // Black Friday is global but excluded in India.
        assert_eq!(active_theme(D(2026, 11, 28), "US").unwrap().id, "black-friday-2026");
        assert!(active_theme(D(2026, 11, 28), "IN").is_none());

        // Holidays outrank winter in December.
        assert_eq!(active_theme(D(2026, 12, 20), "DE").unwrap().id, "holidays-2026");
        assert_eq!(active_theme(D(2027, 1, 10), "DE").unwrap().id, "winter-2026");
        assert!(active_theme(D(2027, 1, 10), "AU").is_none());
    }

    #[test]
    fn test_builtin_windows_are_well_formed() {
        for theme in THEMES {
            assert!(theme.start <= theme.end, "{}", theme.id);
            assert!(!theme.banner.is_empty(), "{}", theme.id);
        }
    }

    #[test]
    fn test_date_ordering() {
        assert!(D(2026, 12, 31) < D(2027, 1, 1));
        assert!(D(2026, 2, 10) < D(2026, 10, 2));
        assert_eq!(D(2026, 3, 4).to_string(), "2026-03-04");
    }
}
