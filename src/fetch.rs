//! Page fetching and article parsing.
//!
//! [`PageFetcher`] is the seam between the pipeline and the network: the real
//! implementation wraps `reqwest` with a desktop user-agent, redirect
//! following, and bounded timeouts; tests substitute canned pages. Parsing a
//! fetched page down to an [`Article`] lives here too, since the two always
//! happen back to back.

use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::models::{Article, FetchedPage};

/// Browser-ish user agent; several news hosts serve bot UAs an empty shell.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Capability for fetching a page over the network.
///
/// Implementations must follow redirects and report the post-redirect URL in
/// [`FetchedPage::final_url`].
pub trait PageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, Box<dyn Error>>;
}

/// The production fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, Box<dyn Error>> {
        let res = self.http.get(url).timeout(timeout).send().await?;
        let status = res.status().as_u16();
        let final_url = res.url().to_string();
        let body = res.text().await?;
        debug!(status, %final_url, bytes = body.len(), "Fetched page");
        Ok(FetchedPage {
            status,
            final_url,
            body,
        })
    }
}

/// Parse a fetched page down to an [`Article`].
///
/// Returns `None` when the page is not worth evaluating: non-2xx status,
/// empty title after trimming, or less than `min_body_chars` of paragraph
/// text. Those are candidate-scoped skips, never errors.
pub fn parse_article(page: &FetchedPage, min_body_chars: usize) -> Option<Article> {
    if page.status != 200 {
        return None;
    }

    let document = Html::parse_document(&page.body);

    let title_selector = Selector::parse("title").ok()?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_string();
    if title.is_empty() {
        return None;
    }

    let p_selector = Selector::parse("p").ok()?;
    let body = document
        .select(&p_selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    if body.len() < min_body_chars {
        return None;
    }

    Some(Article {
        title,
        body,
        source_url: page.final_url.clone(),
    })
}
