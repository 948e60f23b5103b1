//! The quality gate: decides whether a fetched article is worth posting about.
//!
//! Two modes. Permissive mode accepts unconditionally and exists only as the
//! last-resort fallback tier, guaranteeing forward progress when no
//! higher-quality source surfaced. Strict mode asks the model to act as a
//! hard-to-please editor and accepts only an affirmative answer.
//!
//! The gate is opportunistic filtering, not a safety boundary: any failure
//! talking to the classifier degrades to accept.

use tracing::{debug, info, warn};

use crate::api::AskAsync;
use crate::models::Article;
use crate::utils::bounded_snippet;

const SNIPPET_CHARS: usize = 1000;

fn editor_prompt(title: &str, snippet: &str) -> String {
    format!(
        "Act as a strictly critical Editor-in-Chief for a high-end Tech Consultancy.\n\
         \n\
         Article Title: {title}\n\
         Snippet: {snippet}\n\
         \n\
         Task: Decide if this article is worthy of a LinkedIn post for an AI/Tech professional audience.\n\
         Criteria for YES:\n\
         1. Discusses a MAJOR breakthrough, meaningful trend, or useful tool.\n\
         2. Is not just generic marketing fluff or a \"how to install python\" tutorial.\n\
         3. Has substance to comment on.\n\
         \n\
         Reply ONLY with 'YES' or 'NO'."
    )
}

/// Evaluate an article at the given strictness. `true` means accept.
pub async fn evaluate<M>(model: &M, article: &Article, strict: bool) -> bool
where
    M: AskAsync<Response = String>,
{
    if !strict {
        debug!(title = %article.title, "Permissive tier; accepting without review");
        return true;
    }

    let prompt = editor_prompt(&article.title, bounded_snippet(&article.body, SNIPPET_CHARS));
    match model.ask(&prompt).await {
        Ok(decision) => {
            let accepted = decision.trim().to_uppercase().contains("YES");
            info!(title = %article.title, %decision, accepted, "Editor verdict");
            accepted
        }
        Err(e) => {
            // Fail open: a broken classifier must not stall discovery.
            warn!(title = %article.title, error = %e, "Classifier unavailable; accepting");
            true
        }
    }
}
