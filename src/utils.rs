//! Utility functions for URL canonicalization and string bounding.
//!
//! This module provides helper functions used throughout the application:
//! - URL normalization for dedup comparisons
//! - Snippet bounding for prompt construction
//! - String truncation for logging

/// Canonicalize a URL for equality and dedup comparisons.
///
/// Removes everything from the first `?` or `#` onward, then strips one
/// trailing `/`. Two links that differ only by query string, fragment, or
/// trailing slash normalize to the same value.
///
/// The function is total: malformed input is returned unchanged (minus any
/// query/fragment suffix it happens to carry).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("https://x.com/a?x=1"), "https://x.com/a");
/// assert_eq!(normalize_url("https://x.com/a/"), "https://x.com/a");
/// assert_eq!(normalize_url("https://x.com/a#frag"), "https://x.com/a");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let cut = raw.find(['?', '#']).map(|i| &raw[..i]).unwrap_or(raw);
    cut.strip_suffix('/').unwrap_or(cut).to_string()
}

/// Bound a snippet to at most `max` characters for prompt construction.
///
/// Truncation is character-based so multi-byte article text never splits a
/// UTF-8 sequence.
pub fn bounded_snippet(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => format!("{}…(+{} bytes)", &s[..i], s.len() - i),
        None => s.to_string(),
    }
}
