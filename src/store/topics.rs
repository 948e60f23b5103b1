//! The topic-usage history.
//!
//! A JSON array of `{date, topic}` records, rewritten whole on every update.
//! Ordered by append time; when the history grows past its cap only the most
//! recently appended entries survive, so eviction is FIFO by insertion, not
//! by date.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::models::TopicRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct TopicHistory {
    path: PathBuf,
    cap: usize,
}

impl TopicHistory {
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
        }
    }

    /// Load the full history. Missing or corrupt file is empty history.
    pub fn load(&self) -> Vec<TopicRecord> {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e,
                    "Topic history is corrupt; treating as empty");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    /// Topics used within the last `window_days`, relative to today.
    pub fn banned_topics(&self, window_days: i64) -> HashSet<String> {
        self.banned_topics_at(chrono::Local::now().date_naive(), window_days)
    }

    /// Window query against an explicit "now", so tests can pin the clock.
    /// Records with unparsable dates are skipped.
    pub fn banned_topics_at(&self, now: NaiveDate, window_days: i64) -> HashSet<String> {
        let cutoff = now - Duration::days(window_days);
        self.load()
            .into_iter()
            .filter_map(|record| {
                let date = NaiveDate::parse_from_str(&record.date, DATE_FORMAT).ok()?;
                (date > cutoff).then_some(record.topic)
            })
            .collect()
    }

    /// Append a topic dated today, trimming to the cap.
    pub fn log_topic(&self, topic: &str) {
        self.log_topic_at(chrono::Local::now().date_naive(), topic);
    }

    pub fn log_topic_at(&self, now: NaiveDate, topic: &str) {
        let mut history = self.load();
        history.push(TopicRecord {
            date: now.format(DATE_FORMAT).to_string(),
            topic: topic.to_string(),
        });
        if history.len() > self.cap {
            history = history.split_off(history.len() - self.cap);
        }

        let result = serde_json::to_string_pretty(&history)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => debug!(topic, entries = history.len(), "Logged topic usage"),
            Err(e) => warn!(path = %self.path.display(), topic, error = %e,
                "Failed to persist topic history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let history = TopicHistory::new(dir.path().join("nope.json"), 50);
        assert!(history.load().is_empty());
        assert!(history.banned_topics_at(day(2025, 11, 20), 5).is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topic_history.json");
        fs::write(&path, "{{{ not json").unwrap();
        let history = TopicHistory::new(&path, 50);
        assert!(history.load().is_empty());
    }

    #[test]
    fn test_banned_window_includes_recent_excludes_old() {
        let dir = tempdir().unwrap();
        let history = TopicHistory::new(dir.path().join("topic_history.json"), 50);
        let now = day(2025, 11, 20);

        history.log_topic_at(now - Duration::days(10), "old topic");
        history.log_topic_at(now - Duration::days(1), "fresh topic");

        let banned = history.banned_topics_at(now, 5);
        assert!(banned.contains("fresh topic"));
        assert!(!banned.contains("old topic"));
    }

    #[test]
    fn test_unparsable_dates_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topic_history.json");
        fs::write(
            &path,
            r#"[{"date": "last tuesday", "topic": "bad"},
               {"date": "2025-11-19", "topic": "good"}]"#,
        )
        .unwrap();
        let banned = TopicHistory::new(&path, 50).banned_topics_at(day(2025, 11, 20), 5);
        assert!(banned.contains("good"));
        assert!(!banned.contains("bad"));
    }

    #[test]
    fn test_eviction_keeps_most_recent_fifty() {
        let dir = tempdir().unwrap();
        let history = TopicHistory::new(dir.path().join("topic_history.json"), 50);
        let now = day(2025, 11, 20);

        for i in 0..51 {
            history.log_topic_at(now, &format!("topic {i}"));
        }

        let records = history.load();
        assert_eq!(records.len(), 50);
        assert!(!records.iter().any(|r| r.topic == "topic 0"));
        assert_eq!(records.last().unwrap().topic, "topic 50");
    }
}
