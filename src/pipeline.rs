//! The fallback strategy controller.
//!
//! One uniform loop evaluates an ordered [`AttemptPlan`]: for each tier,
//! search, extract candidates, and walk them in page order until something
//! survives fetching, filtering, and the quality gate. The first acceptance
//! wins and everything after it — remaining candidates and remaining tiers —
//! goes unused. Exhausting the whole plan is a normal terminal outcome.
//!
//! The controller owns the "what gets marked seen, when" rules:
//! - a strict-mode gate reject is terminal for that URL and is recorded
//!   immediately, so it is never re-evaluated on a later run;
//! - an accepted URL is NOT recorded here — the caller records it only after
//!   the downstream publish confirms success, so a discovered-but-unpublished
//!   article cannot pollute the ledger;
//! - fetch errors, paywalls, and thin pages are skips, not decisions, and
//!   leave no trace.

use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::api::AskAsync;
use crate::config::Config;
use crate::discovery::{self, exclude, extract};
use crate::fetch::{PageFetcher, parse_article};
use crate::gate;
use crate::models::{Article, Attempt, AttemptPlan, Discovery};
use crate::store::seen::SeenLedger;
use crate::utils::normalize_url;

/// Build the run's attempt plan: the suggested topic first, then the
/// configured broad-category safety nets.
pub fn build_plan(suggested_topic: String, config: &Config) -> AttemptPlan {
    let mut plan = vec![Attempt::new(suggested_topic, config.suggested_strict)];
    plan.extend(
        config
            .fallback_tiers
            .iter()
            .map(|tier| Attempt::new(tier.topic.clone(), tier.strict)),
    );
    plan
}

pub struct Pipeline<'a, F, M> {
    pub fetcher: &'a F,
    pub model: &'a M,
    pub ledger: &'a SeenLedger,
    pub config: &'a Config,
}

impl<F, M> Pipeline<'_, F, M>
where
    F: PageFetcher,
    M: AskAsync<Response = String>,
{
    /// Evaluate the plan in order; first acceptance wins.
    #[instrument(level = "info", skip_all, fields(tiers = plan.len()))]
    pub async fn run(&self, plan: &AttemptPlan) -> Discovery {
        for (i, attempt) in plan.iter().enumerate() {
            info!(
                attempt = i + 1,
                topic = %attempt.topic,
                strict = attempt.strict,
                "Trying attempt"
            );
            if let Some(article) = self.try_attempt(attempt).await {
                info!(title = %article.title, source = %article.source_url, "Content found");
                return Discovery::Accepted {
                    article,
                    topic: attempt.topic.clone(),
                };
            }
            info!(topic = %attempt.topic, "No suitable content; advancing to next fallback");
        }
        info!("All attempts exhausted without an acceptance");
        Discovery::Exhausted
    }

    /// One tier: search, extract, evaluate candidates in order.
    async fn try_attempt(&self, attempt: &Attempt) -> Option<Article> {
        let search_timeout = Duration::from_secs(self.config.search_timeout_secs);
        let article_timeout = Duration::from_secs(self.config.article_timeout_secs);

        let url = discovery::search_url(&self.config.search_base_url, &attempt.topic);
        let results_page = match self.fetcher.fetch(&url, search_timeout).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%url, error = %e, "Search page fetch failed");
                return None;
            }
        };

        let host = match discovery::search_host(&self.config.search_base_url) {
            Ok(host) => host,
            Err(e) => {
                warn!(base = %self.config.search_base_url, error = %e, "Unusable search base URL");
                return None;
            }
        };

        let seen = self.ledger.load();
        let candidates = extract::extract_candidates(
            &results_page.body,
            &host,
            &self.config.relevance_keywords,
            &seen,
        );
        info!(count = candidates.len(), topic = %attempt.topic, "Extracted candidates");

        let mut evaluated = 0usize;
        for candidate in &candidates {
            if evaluated >= self.config.candidate_cap {
                debug!(cap = self.config.candidate_cap, "Per-attempt candidate cap reached");
                break;
            }
            evaluated += 1;

            let page = match self.fetcher.fetch(&candidate.raw_url, article_timeout).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(url = %candidate.raw_url, error = %e, "Candidate fetch failed; skipping");
                    continue;
                }
            };

            // The real destination is only visible after redirects.
            if exclude::is_paywalled(&page.final_url) {
                debug!(url = %page.final_url, "Paywalled destination; skipping");
                continue;
            }
            if seen.contains(&normalize_url(&page.final_url)) {
                debug!(url = %page.final_url, "Already processed; skipping");
                continue;
            }

            let Some(article) = parse_article(&page, self.config.min_body_chars) else {
                debug!(url = %page.final_url, "No usable title/body; skipping");
                continue;
            };

            debug!(title = %article.title, "Evaluating candidate");
            if gate::evaluate(self.model, &article, attempt.strict).await {
                return Some(article);
            }
            // Terminal reject: record it so later runs never re-evaluate it.
            self.ledger.mark_seen(&page.final_url);
        }
        None
    }
}
