//! Static exclusion filtering for candidate URLs.
//!
//! Search-results pages are littered with links that are never articles:
//! CDN assets, login flows, AMP/feed variants, tracking endpoints. The
//! denylist below is matched as a lowercased substring against the raw URL.

/// Substrings that disqualify a URL from candidacy.
const EXCLUDE_PATTERNS: &[&str] = &[
    // CDN / static-asset hosts
    "gstatic.com",
    "googleusercontent.com",
    "google.com/search",
    "google.com/url",
    "accounts.google.com",
    "play.google.com",
    "blogger.googleusercontent.com",
    "cdn-apple.com",
    "cloudfront.net",
    "springernature.com",
    "b-cdn.net",
    "transforms.svdcdn.com",
    "contentstack.com",
    "storage.googleapis.com",
    "lh3.googleusercontent.com",
    // image assets
    ".jpg",
    ".jpeg",
    ".png",
    ".gif",
    ".webp",
    ".ico",
    "favicon",
    "image",
    "/img/",
    "/images/",
    "media.",
    "thumbnail",
    // auth / account flows
    "accounts.",
    "login.",
    "auth.",
    "signup",
    // AMP / feed variants
    "amp/",
    ".amp",
    "rss/",
    "feed/",
    // tracking / subscription noise
    "subscribe",
    "advertisement",
    "analytics",
];

/// Hosts that resolve to hard paywalls; checked against the post-redirect
/// final URL, where the real destination is first visible.
const PAYWALL_HOSTS: &[&str] = &["nyt.com", "wsj.com", "bloomberg.com", "youtube.com"];

/// True if the URL matches any entry of the static denylist.
pub fn is_excluded(url: &str) -> bool {
    let lower = url.to_lowercase();
    EXCLUDE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// True if the post-redirect URL lands on a paywalled host.
pub fn is_paywalled(final_url: &str) -> bool {
    let lower = final_url.to_lowercase();
    PAYWALL_HOSTS.iter().any(|h| lower.contains(h))
}
