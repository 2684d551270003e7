//! Slug normalization for city, state and keyword tokens.

/// Converts free text into a lowercase, hyphen-separated slug.
///
/// # Normalization Rules
///
/// 1. Leading and trailing whitespace is trimmed
/// 2. The text is lowercased
/// 3. Every internal whitespace run collapses to a single `-`
///
/// The function is idempotent and never fails; empty or whitespace-only input
/// yields an empty string.
///
/// # Examples
///
/// ```
/// use seo_urlgen::utils::slug::slugify;
///
/// assert_eq!(slugify("New York"), "new-york");
/// assert_eq!(slugify("  Foo   Bar "), "foo-bar");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
