//! Topic selection: ask the model for a trending search term.
//!
//! The suggestion capability is best-effort. Whatever comes back is
//! sanitized down to a short search phrase, and any failure — network,
//! quota, empty reply — collapses to a static fallback topic. Nothing here
//! ever raises past this boundary.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::api::AskAsync;

/// Safe topic when suggestion is unavailable; broad enough to always have
/// news written about it.
pub const FALLBACK_TOPIC: &str = "Artificial Intelligence News";

const MAX_TOPIC_WORDS: usize = 5;

fn suggestion_prompt(banned: &HashSet<String>, today: &str) -> String {
    let avoid = if banned.is_empty() {
        "None".to_string()
    } else {
        banned.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    format!(
        "Suggest ONE currently trending search term/topic in the Technology sector for today ({today}).\n\
         \n\
         Scope:\n\
         - AI & Tech (Generative AI, Robotics, Hardware, Software)\n\
         - Tech x Finance (FinTech, Crypto regulations, AI in banking)\n\
         - Tech x Marketing (AdTech, Social Media algorithms, AI content)\n\
         \n\
         Context:\n\
         - This is for a bot that finds news articles to comment on.\n\
         - The topic must be popular enough to have news written about it TODAY.\n\
         \n\
         Constraints:\n\
         - Respond with JUST the search term. No quotes, no explanations.\n\
         - Do NOT suggest any of these previously covered topics: {avoid}\n\
         - Keep it under {MAX_TOPIC_WORDS} words."
    )
}

/// Collapse a model reply into a usable short search phrase.
///
/// Strips quote characters, keeps only the first line, and bounds the phrase
/// to [`MAX_TOPIC_WORDS`] words. An empty result after cleaning yields `None`.
fn sanitize_topic(raw: &str) -> Option<String> {
    let cleaned = raw
        .lines()
        .next()?
        .replace(['"', '\''], "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return None;
    }
    let phrase = cleaned
        .split_whitespace()
        .take(MAX_TOPIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    Some(phrase)
}

/// Ask for a fresh topic, avoiding everything in `banned`.
pub async fn suggest_topic<M>(model: &M, banned: &HashSet<String>) -> String
where
    M: AskAsync<Response = String>,
{
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let prompt = suggestion_prompt(banned, &today);

    match model.ask(&prompt).await {
        Ok(reply) => match sanitize_topic(&reply) {
            Some(topic) => {
                info!(%topic, "Model suggested topic");
                topic
            }
            None => {
                warn!("Suggestion came back empty; using fallback topic");
                FALLBACK_TOPIC.to_string()
            }
        },
        Err(e) => {
            warn!(error = %e, "Topic suggestion failed; using fallback topic");
            FALLBACK_TOPIC.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[derive(Debug)]
    struct Scripted(&'static str);

    impl AskAsync for Scripted {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct Down;

    impl AskAsync for Down {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Err("quota exceeded".into())
        }
    }

    #[tokio::test]
    async fn test_suggestion_is_sanitized() {
        let topic = suggest_topic(&Scripted("\"Nvidia stock surge\"\n"), &HashSet::new()).await;
        assert_eq!(topic, "Nvidia stock surge");
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let topic = suggest_topic(&Down, &HashSet::new()).await;
        assert_eq!(topic, FALLBACK_TOPIC);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let topic = suggest_topic(&Scripted("  \n"), &HashSet::new()).await;
        assert_eq!(topic, FALLBACK_TOPIC);
    }

    #[test]
    fn test_sanitize_bounds_word_count() {
        let long = "one two three four five six seven";
        assert_eq!(sanitize_topic(long).unwrap(), "one two three four five");
    }

    #[test]
    fn test_sanitize_keeps_first_line_only() {
        let multi = "Gemini 3 launch\nHere is why it matters";
        assert_eq!(sanitize_topic(multi).unwrap(), "Gemini 3 launch");
    }

    #[test]
    fn test_prompt_lists_banned_topics() {
        let banned: HashSet<String> = ["Quantum computing".to_string()].into();
        let prompt = suggestion_prompt(&banned, "2025-11-20");
        assert!(prompt.contains("Quantum computing"));
        assert!(prompt.contains("2025-11-20"));
    }
}
