//! Command-line interface definitions for Newshound.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Secrets can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the Newshound application.
///
/// # Examples
///
/// ```sh
/// # Autonomous run: suggest a topic, discover, generate, publish
/// newshound
///
/// # Scout a specific subject instead of asking for a trending one
/// newshound --topic "Google DeepMind"
///
/// # Preview the generated post without publishing or recording anything
/// newshound --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the processed-URLs ledger (CSV with a `url` column)
    #[arg(short, long, default_value = "processed_urls.csv")]
    pub seen_store: String,

    /// Path to the topic-usage history (JSON array of {date, topic})
    #[arg(short = 't', long, default_value = "topic_history.json")]
    pub topic_history: String,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Search this topic directly instead of asking for a trending one
    #[arg(long)]
    pub topic: Option<String>,

    /// Generate the post but skip publishing and all ledger/history writes
    #[arg(long)]
    pub dry_run: bool,

    /// Override the banned-topic window from config (days)
    #[arg(long)]
    pub window_days: Option<i64>,

    /// Gemini API key for topic suggestion, gating, and post generation
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Access token for the publish sink
    #[arg(long, env = "LINKEDIN_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Author URN the published post is attributed to
    #[arg(long, env = "LINKEDIN_AUTHOR_URN")]
    pub author_urn: Option<String>,
}
