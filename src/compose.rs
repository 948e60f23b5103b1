//! Post generation for an accepted article.
//!
//! Turns the article's title and a bounded slice of its body into the
//! engagement-post prompt and returns the model's text. Unlike the gate and
//! the topic selector, failure here is surfaced to the caller: with no post
//! text there is nothing to publish, so the run ends without touching the
//! ledger or the history.

use std::error::Error;
use tracing::{info, instrument};

use crate::api::AskAsync;
use crate::models::Article;
use crate::utils::bounded_snippet;

const BODY_CHARS: usize = 2000;

fn post_prompt(title: &str, body: &str) -> String {
    format!(
        "ROLE: Expert AI Thought Leader & Tech Influencer.\n\
         TONE: Professional yet conversational, insightful, forward-thinking.\n\
         \n\
         SOURCE MATERIAL:\n\
         Title: {title}\n\
         Content: {body}\n\
         \n\
         TASK: Write a LinkedIn post that will get high engagement.\n\
         \n\
         STRUCTURE:\n\
         1. **The Hook**: A standalone, punchy one-liner that disrupts common thinking or states a surprising fact. (Max 15 words)\n\
         2. **The Spacer**: A blank line.\n\
         3. **The Insight**: 2-3 short paragraphs explaining WHY this matters. Do not just summarize. Add value. Synthesize. Connect dots.\n\
         4. **The Pivot**: \"This changes how we think about [Concept]...\"\n\
         5. **The Question**: An engaging question to drive comments.\n\
         6. **Hashtags**: 3-5 relevant, high-traffic hashtags.\n\
         \n\
         CONSTRAINTS:\n\
         - NO \"In this article\" or \"I was reading today\". Start directly with the topic.\n\
         - NO \"Thrilled to announce\" or generic corporate speak.\n\
         - NO long walls of text. Use short sentences.\n\
         - DO NOT include the URL in the text body (it will be attached as a link card).\n\
         - Emoji usage: Moderate (2-3 max), used for emphasis, not decoration.\n\
         \n\
         OUTPUT FORMAT:\n\
         Just the post text. No \"Here is the post\" preamble."
    )
}

/// Generate the post text for an accepted article.
#[instrument(level = "info", skip_all, fields(title = %article.title))]
pub async fn compose_post<M>(model: &M, article: &Article) -> Result<String, Box<dyn Error>>
where
    M: AskAsync<Response = String>,
{
    let prompt = post_prompt(&article.title, bounded_snippet(&article.body, BODY_CHARS));
    let text = model.ask(&prompt).await?.trim().to_string();
    if text.is_empty() {
        return Err("model returned an empty post".into());
    }
    info!(chars = text.len(), "Generated post text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Scripted(&'static str);

    impl AskAsync for Scripted {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Ok(self.0.to_string())
        }
    }

    fn article() -> Article {
        Article {
            title: "Chips get faster".to_string(),
            body: "body ".repeat(1000),
            source_url: "https://techsite.com/ai-story".to_string(),
        }
    }

    #[tokio::test]
    async fn test_compose_trims_reply() {
        let post = compose_post(&Scripted("\n  The future arrived early. \n"), &article())
            .await
            .unwrap();
        assert_eq!(post, "The future arrived early.");
    }

    #[tokio::test]
    async fn test_compose_rejects_empty_reply() {
        assert!(compose_post(&Scripted("   "), &article()).await.is_err());
    }

    #[test]
    fn test_prompt_bounds_body() {
        let long_body = "x".repeat(10_000);
        let prompt = post_prompt("t", bounded_snippet(&long_body, BODY_CHARS));
        // Prompt scaffolding plus at most BODY_CHARS of article text.
        assert!(prompt.len() < BODY_CHARS + 2000);
    }
}
