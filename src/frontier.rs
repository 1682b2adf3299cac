//! Persistent, deduplicated, resumable work queue of URLs.
//!
//! The frontier is the system of record for seen/completed state and parent
//! relationships. The durable store lives in [`crate::state`]; this module
//! adds the in-memory pending stack, normalization-before-hashing, and the
//! startup reconstruction that makes an interrupted crawl resumable.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::CrawlConfig;
use crate::filter::UrlValidityFilter;
use crate::report::ReportLogs;
use crate::state::{FrontierStore, StateError, UrlRecord};
use crate::url_utils::{normalize, url_hash};

#[derive(Debug, thiserror::Error)]
pub enum FrontierError {
    #[error("url never added to frontier: {0}")]
    NotFound(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Frontier {
    store: Arc<FrontierStore>,
    /// LIFO stack of normalized URLs awaiting fetch (depth-first bias).
    pending: Mutex<Vec<String>>,
    reports: Arc<ReportLogs>,
}

impl Frontier {
    /// Load (or restart) the frontier and provision the report logs.
    ///
    /// With `restart`, any prior store and logs are discarded and the
    /// frontier is reseeded from `config.seed_urls`. Otherwise the pending
    /// stack is rebuilt from incomplete records that still pass the cheap
    /// validity checks, falling back to seeding when the store is empty.
    pub fn initialize(config: &CrawlConfig, restart: bool) -> Result<Self, FrontierError> {
        let store = FrontierStore::open(&config.save_path, restart)?;
        let reports = ReportLogs::provision(&config.url_log_path, &config.word_log_path, restart)?;

        let frontier = Self {
            store: Arc::new(store),
            pending: Mutex::new(Vec::new()),
            reports: Arc::new(reports),
        };

        if restart {
            frontier.seed(config)?;
        } else {
            frontier.rebuild_pending(config)?;
            if frontier.store.record_count()? == 0 {
                frontier.seed(config)?;
            }
        }

        Ok(frontier)
    }

    fn seed(&self, config: &CrawlConfig) -> Result<(), FrontierError> {
        for url in &config.seed_urls {
            self.add_url(url, None)?;
        }
        Ok(())
    }

    /// Reconstruct the pending stack from incomplete records that still pass
    /// the filter's non-network checks.
    fn rebuild_pending(&self, config: &CrawlConfig) -> Result<(), FrontierError> {
        let filter = UrlValidityFilter::new(config);
        let mut pending = self.pending.lock();
        let mut total = 0usize;

        self.store.for_each(|record| {
            total += 1;
            if !record.completed && filter.passes_cheap_checks(&record.url).unwrap_or(false) {
                pending.push(record.url);
            }
            Ok(())
        })?;

        tracing::info!(
            "Found {} urls to be downloaded from {} total urls discovered",
            pending.len(),
            total
        );
        Ok(())
    }

    /// Pop the most recently pushed pending URL; `None` means the queue is
    /// drained (the crawl may be complete once in-flight work settles).
    pub fn get_next(&self) -> Option<String> {
        self.pending.lock().pop()
    }

    /// Admit a URL, silently deduplicating against everything ever seen.
    ///
    /// The record is durably committed before the pending push, so a crash
    /// between the two re-queues the URL on restart instead of losing it.
    pub fn add_url(&self, url: &str, parent_url: Option<&str>) -> Result<(), FrontierError> {
        let normalized = normalize(url);
        let hash = url_hash(&normalized);

        // A record may not name itself as parent; drop the pointer rather
        // than create an immediate cycle in the ancestry forest.
        let parent = parent_url
            .map(normalize)
            .filter(|p| *p != normalized);

        let record = UrlRecord::new(normalized.clone(), parent);
        if self.store.insert_if_absent(&hash, &record)? {
            self.pending.lock().push(normalized);
        }
        Ok(())
    }

    /// Flip a URL's record to completed, preserving its parent pointer.
    ///
    /// Completing a URL that was never added indicates a caller bug; it is
    /// logged loudly but does not abort the crawl.
    pub fn mark_complete(&self, url: &str) -> Result<(), FrontierError> {
        let normalized = normalize(url);
        let hash = url_hash(&normalized);

        if !self.store.mark_complete(&hash)? {
            tracing::error!("Completed url {}, but have not seen it before", normalized);
        }
        Ok(())
    }

    /// The stored parent pointer, or `FrontierError::NotFound` if the URL was
    /// never added.
    pub fn get_parent(&self, url: &str) -> Result<Option<String>, FrontierError> {
        let normalized = normalize(url);
        let hash = url_hash(&normalized);

        match self.store.get(&hash)? {
            Some(record) => Ok(record.parent_url),
            None => Err(FrontierError::NotFound(normalized)),
        }
    }

    /// Pure membership test against the durable store.
    pub fn exists(&self, url: &str) -> Result<bool, FrontierError> {
        let hash = url_hash(&normalize(url));
        Ok(self.store.contains(&hash)?)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn reports(&self) -> Arc<ReportLogs> {
        Arc::clone(&self.reports)
    }

    pub fn stats(&self) -> Result<FrontierStats, FrontierError> {
        Ok(FrontierStats {
            total: self.store.record_count()?,
            completed: self.store.completed_count()?,
            pending: self.pending_len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct FrontierStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl std::fmt::Display for FrontierStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Frontier: {} discovered, {} completed, {} pending",
            self.total, self.completed, self.pending
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> CrawlConfig {
        CrawlConfig {
            seed_urls: vec!["https://www.ics.uci.edu".to_string()],
            save_path: dir.path().join("frontier.redb"),
            url_log_path: dir.path().join("urls.csv"),
            word_log_path: dir.path().join("words.txt"),
            log_dir: dir.path().join("logs"),
            ..CrawlConfig::default()
        }
    }

    #[test]
    fn test_initialize_seeds_fresh_store() {
        let dir = TempDir::new().unwrap();
        let frontier = Frontier::initialize(&test_config(&dir), true).unwrap();

        assert_eq!(frontier.pending_len(), 1);
        assert_eq!(
            frontier.get_next(),
            Some("https://www.ics.uci.edu".to_string())
        );
        assert!(frontier.get_next().is_none());
    }

    #[test]
    fn test_add_url_dedups() {
        let dir = TempDir::new().unwrap();
        let frontier = Frontier::initialize(&test_config(&dir), true).unwrap();

        frontier
            .add_url("https://www.ics.uci.edu/page", Some("https://www.ics.uci.edu"))
            .unwrap();
        frontier
            .add_url("https://www.ics.uci.edu/page", Some("https://www.ics.uci.edu"))
            .unwrap();
        // Fragment and trailing-slash variants collapse to the same record.
        frontier
            .add_url("https://www.ics.uci.edu/page/#top", None)
            .unwrap();

        let stats = frontier.stats().unwrap();
        assert_eq!(stats.total, 2); // seed + page
        assert_eq!(stats.pending, 2);
    }

    #[test]
    fn test_get_next_is_lifo() {
        let dir = TempDir::new().unwrap();
        let frontier = Frontier::initialize(&test_config(&dir), true).unwrap();

        frontier.add_url("https://www.ics.uci.edu/a", None).unwrap();
        frontier.add_url("https://www.ics.uci.edu/b", None).unwrap();

        assert_eq!(frontier.get_next(), Some("https://www.ics.uci.edu/b".to_string()));
        assert_eq!(frontier.get_next(), Some("https://www.ics.uci.edu/a".to_string()));
    }

    #[test]
    fn test_get_parent_unknown_url_errors() {
        let dir = TempDir::new().unwrap();
        let frontier = Frontier::initialize(&test_config(&dir), true).unwrap();

        match frontier.get_parent("https://www.ics.uci.edu/never-added") {
            Err(FrontierError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_self_parent_is_dropped() {
        let dir = TempDir::new().unwrap();
        let frontier = Frontier::initialize(&test_config(&dir), true).unwrap();

        frontier
            .add_url("https://www.ics.uci.edu/loop", Some("https://www.ics.uci.edu/loop/"))
            .unwrap();
        assert_eq!(
            frontier.get_parent("https://www.ics.uci.edu/loop").unwrap(),
            None
        );
    }

    #[test]
    fn test_mark_complete_unseen_is_nonfatal() {
        let dir = TempDir::new().unwrap();
        let frontier = Frontier::initialize(&test_config(&dir), true).unwrap();
        frontier
            .mark_complete("https://www.ics.uci.edu/never-added")
            .unwrap();
    }

    #[test]
    fn test_resume_requeues_only_incomplete() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        {
            let frontier = Frontier::initialize(&config, true).unwrap();
            frontier.add_url("https://www.ics.uci.edu/a", None).unwrap();
            frontier
                .add_url("https://www.ics.uci.edu/b", Some("https://www.ics.uci.edu/a"))
                .unwrap();
            frontier.mark_complete("https://www.ics.uci.edu").unwrap();
            frontier.mark_complete("https://www.ics.uci.edu/b").unwrap();
        }

        let frontier = Frontier::initialize(&config, false).unwrap();
        let mut pending = Vec::new();
        while let Some(url) = frontier.get_next() {
            pending.push(url);
        }
        assert_eq!(pending, vec!["https://www.ics.uci.edu/a".to_string()]);

        // Completion state and parents survived the restart.
        assert!(frontier.exists("https://www.ics.uci.edu/b").unwrap());
        assert_eq!(
            frontier.get_parent("https://www.ics.uci.edu/b").unwrap(),
            Some("https://www.ics.uci.edu/a".to_string())
        );
    }

    #[test]
    fn test_resume_drops_now_invalid_urls() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        {
            let frontier = Frontier::initialize(&config, true).unwrap();
            frontier.mark_complete("https://www.ics.uci.edu").unwrap();
            // Outside the domain whitelist; admitted here directly to
            // simulate a policy change between runs.
            frontier.add_url("https://www.example.com/x", None).unwrap();
        }

        let frontier = Frontier::initialize(&config, false).unwrap();
        assert_eq!(frontier.pending_len(), 0);
        // Still in the store, just not requeued.
        assert!(frontier.exists("https://www.example.com/x").unwrap());
    }
}
