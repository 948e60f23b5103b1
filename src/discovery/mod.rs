//! Candidate discovery over a news search host.
//!
//! Discovery is three steps, each in its own submodule or function:
//!
//! 1. Build the search-results URL for a topic ([`search_url`])
//! 2. Extract candidate links from the fetched page ([`extract`])
//! 3. Reject structurally useless links ([`exclude`])
//!
//! The pipeline composes these with fetching and gating; nothing in this
//! module touches the network itself.

pub mod exclude;
pub mod extract;

use url::Url;

/// Build the search-results URL for a topic.
///
/// Spaces become `+` (the host treats them as term separators); everything
/// else is percent-encoded.
pub fn search_url(search_base: &str, topic: &str) -> String {
    let query = urlencoding::encode(topic).replace("%20", "+");
    format!("{search_base}/search?q={query}&hl=en-US&gl=US&ceid=US:en")
}

/// Parsed form of the search host, used to resolve relative links.
pub fn search_host(search_base: &str) -> Result<Url, url::ParseError> {
    Url::parse(search_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_joins_terms_with_plus() {
        let url = search_url("https://news.google.com", "Nvidia stock surge");
        assert_eq!(
            url,
            "https://news.google.com/search?q=Nvidia+stock+surge&hl=en-US&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_search_url_percent_encodes_specials() {
        let url = search_url("https://news.google.com", "AI & finance");
        assert!(url.contains("AI+%26+finance"));
    }
}
