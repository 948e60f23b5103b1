//! The processed-URLs ledger.
//!
//! A CSV file with a single `url` column, one normalized URL per row,
//! append-only. Membership is set-based on read-back, so appending an URL
//! twice is harmless.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::utils::normalize_url;

const HEADER: &str = "url";

/// Handle to the ledger file. Cheap to construct; every operation re-reads
/// the file, matching the one-process-at-a-time design.
#[derive(Debug, Clone)]
pub struct SeenLedger {
    path: PathBuf,
}

impl SeenLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the full set of seen normalized URLs.
    ///
    /// A missing or unreadable file is an empty set, never an error.
    pub fn load(&self) -> HashSet<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && *line != HEADER)
                .map(String::from)
                .collect(),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No readable ledger; starting empty");
                HashSet::new()
            }
        }
    }

    /// Test membership of a URL (normalized before comparison).
    pub fn is_seen(&self, url: &str) -> bool {
        self.load().contains(&normalize_url(url))
    }

    /// Append a URL to the ledger, creating the file (with header) on first
    /// use. Safe to call for URLs never passed to [`is_seen`]. A write
    /// failure is logged and swallowed.
    pub fn mark_seen(&self, url: &str) {
        let normalized = normalize_url(url);
        let result = (|| -> std::io::Result<()> {
            let fresh = !self.path.exists();
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            if fresh {
                writeln!(file, "{HEADER}")?;
            }
            writeln!(file, "{normalized}")
        })();

        match result {
            Ok(()) => debug!(url = %normalized, "Recorded URL in ledger"),
            Err(e) => {
                warn!(path = %self.path.display(), url = %normalized, error = %e,
                    "Failed to record URL; it may be re-processed on a later run");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_set() {
        let dir = tempdir().unwrap();
        let ledger = SeenLedger::new(dir.path().join("nope.csv"));
        assert!(ledger.load().is_empty());
        assert!(!ledger.is_seen("https://x.com/a"));
    }

    #[test]
    fn test_mark_then_seen_in_process_and_after_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed_urls.csv");
        let ledger = SeenLedger::new(&path);

        ledger.mark_seen("https://x.com/a?utm=1");
        assert!(ledger.is_seen("https://x.com/a"));
        assert!(ledger.is_seen("https://x.com/a/"));

        // A fresh handle over the same file sees the entry too.
        let reloaded = SeenLedger::new(&path);
        assert!(reloaded.is_seen("https://x.com/a?other=2"));
    }

    #[test]
    fn test_file_starts_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed_urls.csv");
        SeenLedger::new(&path).mark_seen("https://x.com/a");

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("url"));
        assert_eq!(lines.next(), Some("https://x.com/a"));
    }

    #[test]
    fn test_double_mark_reads_back_as_one_member() {
        let dir = tempdir().unwrap();
        let ledger = SeenLedger::new(dir.path().join("urls.csv"));
        ledger.mark_seen("https://x.com/a");
        ledger.mark_seen("https://x.com/a/");
        let set = ledger.load();
        assert_eq!(set.len(), 1);
        assert!(set.contains("https://x.com/a"));
    }
}
