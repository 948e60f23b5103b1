//! Candidate extraction from a search-results page.
//!
//! Extraction is two independent passes unioned by the caller of each:
//!
//! 1. **Structural pass** — every `a[href]` target, relative links resolved
//!    against the search host. Precise, but misses links the page embeds in
//!    script data rather than anchors.
//! 2. **Pattern pass** — a permissive scan of the raw HTML for anything
//!    shaped like an absolute URL, which recovers those embedded links.
//!
//! The union is deduplicated by normalized URL in first-seen order, run
//! through the static exclusion filter, pruned of already-seen URLs, and
//! finally reduced by a keyword relevance pass. When the keyword pass comes
//! back empty the extractor falls back to article-like path markers
//! (`/read/`, `articles`) — strict keyword matching on some result pages
//! yields nothing even though valid articles are present, so recall wins
//! over precision only on an otherwise empty result.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument};
use url::Url;

use super::exclude::is_excluded;
use crate::models::Candidate;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("valid URL regex"));

/// Structural pass: every hyperlink target, resolved against the search host.
fn structural_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&anchor_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Ok(resolved) = base.join(href) {
                links.push(resolved.to_string());
            }
        }
    }
    links
}

/// Pattern pass: every absolute URL-shaped string in the raw HTML.
fn pattern_links(html: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract the ordered candidate list from a search-results page.
///
/// `seen` holds normalized URLs already in the ledger; they are pruned here
/// so the pipeline never wastes a fetch on them.
#[instrument(level = "debug", skip_all, fields(html_bytes = html.len()))]
pub fn extract_candidates(
    html: &str,
    search_base: &Url,
    keywords: &[String],
    seen: &HashSet<String>,
) -> Vec<Candidate> {
    let unioned: Vec<Candidate> = structural_links(html, search_base)
        .into_iter()
        .chain(pattern_links(html))
        .map(Candidate::new)
        .unique_by(|c| c.normalized_url.clone())
        .collect();

    let filtered: Vec<Candidate> = unioned
        .into_iter()
        .filter(|c| !is_excluded(&c.raw_url))
        .filter(|c| !seen.contains(&c.normalized_url))
        .collect();

    let relevant: Vec<Candidate> = filtered
        .iter()
        .filter(|c| {
            let lower = c.raw_url.to_lowercase();
            keywords.iter().any(|kw| lower.contains(kw.as_str()))
        })
        .cloned()
        .collect();

    if !relevant.is_empty() {
        debug!(count = relevant.len(), "Keyword pass produced candidates");
        return relevant;
    }

    // Recall fallback: article-like path markers only.
    let fallback: Vec<Candidate> = filtered
        .into_iter()
        .filter(|c| c.raw_url.contains("/read/") || c.raw_url.contains("articles"))
        .collect();
    debug!(count = fallback.len(), "Fell back to article-marker pass");
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://news.google.com").unwrap()
    }

    fn no_seen() -> HashSet<String> {
        HashSet::new()
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_structural_pass_resolves_relative_links() {
        let html = r#"<a href="./read/abc123">story</a>"#;
        let out = extract_candidates(html, &base(), &kw(&["read"]), &no_seen());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].normalized_url, "https://news.google.com/read/abc123");
    }

    #[test]
    fn test_pattern_pass_recovers_script_embedded_links() {
        let html = r#"<script>var u = "https://techsite.com/ai-news-today";</script>"#;
        let out = extract_candidates(html, &base(), &kw(&["ai"]), &no_seen());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].raw_url, "https://techsite.com/ai-news-today");
    }

    #[test]
    fn test_union_dedupes_by_normalized_url_preserving_order() {
        let html = concat!(
            r#"<a href="https://techsite.com/ai-story?ref=home">one</a>"#,
            r#"<script>"https://techsite.com/ai-story"</script>"#,
            r#"<a href="https://other.com/tech-piece">two</a>"#,
        );
        let out = extract_candidates(html, &base(), &kw(&["ai", "tech"]), &no_seen());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].normalized_url, "https://techsite.com/ai-story");
        assert_eq!(out[1].normalized_url, "https://other.com/tech-piece");
    }

    #[test]
    fn test_never_emits_denylisted_urls() {
        let html = concat!(
            r#"<a href="https://news.example.com/articles/123?utm=abc">good</a>"#,
            r#"<a href="https://ads.example.com/img/banner.jpg">bad</a>"#,
            r#"<a href="https://login.techsite.com/start">auth</a>"#,
        );
        let out = extract_candidates(html, &base(), &kw(&["ai", "articles"]), &no_seen());
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].normalized_url,
            "https://news.example.com/articles/123"
        );
    }

    #[test]
    fn test_seen_urls_are_pruned() {
        let html = r#"<a href="https://techsite.com/ai-story?x=1">s</a>"#;
        let seen: HashSet<String> = ["https://techsite.com/ai-story".to_string()].into();
        let out = extract_candidates(html, &base(), &kw(&["ai"]), &seen);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fallback_only_when_keyword_pass_empty() {
        // No keyword hit, but one /read/ link: fallback yields exactly that.
        let html = concat!(
            r#"<a href="https://host.example.com/read/xyz">story</a>"#,
            r#"<a href="https://host.example.com/about">about</a>"#,
        );
        let out = extract_candidates(html, &base(), &kw(&["finance"]), &no_seen());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].normalized_url, "https://host.example.com/read/xyz");
    }

    #[test]
    fn test_fallback_not_taken_when_keywords_match() {
        let html = concat!(
            r#"<a href="https://host.example.com/tech-today">kw</a>"#,
            r#"<a href="https://host.example.com/read/xyz">marker</a>"#,
        );
        let out = extract_candidates(html, &base(), &kw(&["tech"]), &no_seen());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].normalized_url, "https://host.example.com/tech-today");
    }

    #[test]
    fn test_search_page_filtering_end_to_end() {
        let html = concat!(
            r#"<a href="https://news.example.com/articles/123?utm=abc">ai story</a>"#,
            r#"<a href="https://ads.example.com/img/banner.jpg">ad</a>"#,
        );
        let out = extract_candidates(html, &base(), &kw(&["ai"]), &no_seen());
        let normalized: Vec<&str> = out.iter().map(|c| c.normalized_url.as_str()).collect();
        assert_eq!(normalized, vec!["https://news.example.com/articles/123"]);
    }
}
