//! Text helpers for handles and slugs.

/// Turn a URL slug into a title.
///
/// Words are split on `-` and `_`, each word gets an uppercase first letter,
/// and the words are joined with single spaces.
///
/// ```
/// use saffron_core::text::slug_to_title;
///
/// assert_eq!(slug_to_title("hello-world"), "Hello World");
/// assert_eq!(slug_to_title("mixed-slug_example"), "Mixed Slug Example");
/// assert_eq!(slug_to_title(""), "");
/// ```
#[must_use]
pub fn slug_to_title(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `title`, or the title derived from `slug` when Shopify left it blank.
#[must_use]
pub fn title_or_slug(title: &str, slug: &str) -> String {
    if title.trim().is_empty() {
        slug_to_title(slug)
    } else {
        title.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
