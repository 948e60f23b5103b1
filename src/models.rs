//! Data models for the discovery pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Candidate`]: An unvalidated URL pulled from a search-results page
//! - [`Article`]: A fetched and parsed article ready for quality gating
//! - [`TopicRecord`]: One entry in the topic-usage history
//! - [`Attempt`] / [`AttemptPlan`]: The ordered fallback search plan

use serde::{Deserialize, Serialize};

use crate::utils::normalize_url;

/// An unvalidated article link extracted from a search-results page.
///
/// Candidates exist before any fetch or quality evaluation. The normalized
/// form is the identity used for dedup and ledger membership; the raw form
/// is what actually gets fetched (query strings sometimes matter to the
/// destination server even when they don't matter to us).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The link exactly as it appeared on the results page.
    pub raw_url: String,
    /// Canonical form used for equality and seen-set checks.
    pub normalized_url: String,
}

impl Candidate {
    pub fn new(raw_url: impl Into<String>) -> Self {
        let raw_url = raw_url.into();
        let normalized_url = normalize_url(&raw_url);
        Self {
            raw_url,
            normalized_url,
        }
    }
}

/// A fetched article, parsed down to the parts the rest of the pipeline needs.
///
/// Construction happens in `fetch`; an `Article` only exists if the page had
/// a non-empty title and enough body text to be worth evaluating.
#[derive(Debug, Clone)]
pub struct Article {
    /// Page title, trimmed.
    pub title: String,
    /// Concatenated paragraph text.
    pub body: String,
    /// Post-redirect final location of the page.
    pub source_url: String,
}

/// The raw result of fetching a page, before article parsing.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// Final location after following redirects.
    pub final_url: String,
    pub body: String,
}

/// One entry in the persisted topic-usage history.
///
/// `date` is a calendar date string (`YYYY-MM-DD`); entries with dates that
/// fail to parse are skipped when computing the banned set, never treated as
/// fatal.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TopicRecord {
    pub date: String,
    pub topic: String,
}

/// One (topic, strictness) unit of work within the overall fallback plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Search topic for this tier.
    pub topic: String,
    /// Whether the Quality Gate requires classifier approval for this tier.
    pub strict: bool,
}

impl Attempt {
    pub fn new(topic: impl Into<String>, strict: bool) -> Self {
        Self {
            topic: topic.into(),
            strict,
        }
    }
}

/// Ordered fallback plan, evaluated front to back; first acceptance wins and
/// the remaining entries go unused.
pub type AttemptPlan = Vec<Attempt>;

/// The outcome of one full discovery run.
#[derive(Debug)]
pub enum Discovery {
    /// An article survived filtering and gating; carries the topic that
    /// produced it so history logging can happen after publish.
    Accepted { article: Article, topic: String },
    /// Every attempt in the plan was exhausted without an acceptance. This is
    /// a normal terminal outcome, not an error.
    Exhausted,
}
