//! Run configuration loaded from a YAML file.
//!
//! Everything here has a sensible default so the binary runs with no config
//! file at all; a `config.yaml` only needs to name the fields it overrides.
//! Secrets never live here — API keys and tokens come in through the CLI's
//! env-backed arguments.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One static fallback tier of the attempt plan.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackTier {
    pub topic: String,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// A candidate URL must contain one of these (lowercased substring match)
    /// to survive the relevance pass.
    pub relevance_keywords: Vec<String>,
    /// Whether the freshly suggested topic tier runs the strict quality gate.
    pub suggested_strict: bool,
    /// Static broad-category tiers tried after the suggested topic.
    pub fallback_tiers: Vec<FallbackTier>,
    /// Topics used within this many days are excluded from suggestion.
    pub window_days: i64,
    /// Evaluate at most this many candidates per attempt before moving on.
    pub candidate_cap: usize,
    /// Articles with less body text than this are skipped.
    pub min_body_chars: usize,
    /// Bounded history length; oldest entries evicted beyond this.
    pub history_cap: usize,
    /// Gemini model used for suggestion, gating, and post generation.
    pub model: String,
    /// Base URL of the Gemini API (overridable for tests).
    pub gemini_base_url: String,
    /// Base URL of the news search host (overridable for tests).
    pub search_base_url: String,
    /// Base URL of the publish sink (overridable for tests).
    pub publish_base_url: String,
    pub search_timeout_secs: u64,
    pub article_timeout_secs: u64,
    pub llm_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relevance_keywords: [
                "ai",
                "artificial-intelligence",
                "machine-learning",
                "tech",
                "finance",
                "crypto",
                "robotics",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            suggested_strict: true,
            fallback_tiers: vec![
                FallbackTier {
                    topic: "Artificial Intelligence News".to_string(),
                    strict: true,
                },
                FallbackTier {
                    topic: "Emerging Technology Trends".to_string(),
                    strict: true,
                },
                // Last-resort panic tier: take whatever looks like an article.
                FallbackTier {
                    topic: "TechCrunch".to_string(),
                    strict: false,
                },
            ],
            window_days: 5,
            candidate_cap: 15,
            min_body_chars: 200,
            history_cap: 50,
            model: "gemini-2.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            search_base_url: "https://news.google.com".to_string(),
            publish_base_url: "https://api.linkedin.com".to_string(),
            search_timeout_secs: 15,
            article_timeout_secs: 10,
            llm_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly given path must exist and parse — that failure is the
    /// one configuration error that aborts the run. With no path, a missing
    /// `config.yaml` in the working directory just means defaults.
    pub fn load(explicit_path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match explicit_path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&text)?;
                info!(path, "Loaded configuration");
                Ok(config)
            }
            None => {
                let default_path = Path::new("config.yaml");
                if default_path.exists() {
                    match fs::read_to_string(default_path)
                        .map_err(|e| e.to_string())
                        .and_then(|text| {
                            serde_yaml::from_str::<Config>(&text).map_err(|e| e.to_string())
                        }) {
                        Ok(config) => {
                            info!("Loaded configuration from ./config.yaml");
                            return Ok(config);
                        }
                        Err(e) => {
                            warn!(error = %e, "Ignoring unreadable ./config.yaml; using defaults");
                        }
                    }
                }
                Ok(Config::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_complete() {
        let config = Config::default();
        assert!(config.relevance_keywords.contains(&"ai".to_string()));
        assert_eq!(config.window_days, 5);
        assert_eq!(config.candidate_cap, 15);
        assert_eq!(config.history_cap, 50);
        // The final tier is the permissive safety net.
        assert!(!config.fallback_tiers.last().unwrap().strict);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("window_days: 9\n").unwrap();
        assert_eq!(config.window_days, 9);
        assert_eq!(config.candidate_cap, 15);
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        assert!(Config::load(Some("/definitely/not/here.yaml")).is_err());
    }

    #[test]
    fn test_explicit_path_loads() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "candidate_cap: 3").unwrap();
        let config = Config::load(Some(f.path().to_str().unwrap())).unwrap();
        assert_eq!(config.candidate_cap, 3);
    }
}
