//! Crawl driver: a bounded pool of workers pulling from the frontier,
//! fetching, extracting, filtering, and feeding admitted URLs back in.
//!
//! Termination is quiescence, not emptiness: the loop exits only when the
//! pending queue is empty AND no worker is in flight, because an in-flight
//! worker may still admit new URLs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::task::JoinSet;

use crate::config::CrawlConfig;
use crate::extractor::extract_links;
use crate::filter::UrlValidityFilter;
use crate::frontier::Frontier;
use crate::network::Downloader;

const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub processed: usize,
    pub discovered: usize,
    pub duration_secs: u64,
}

/// Outcome of one crawl step.
struct StepOutcome {
    url: String,
    admitted: usize,
    fetch_error: Option<String>,
}

#[derive(Clone)]
pub struct Crawler {
    config: Arc<CrawlConfig>,
    frontier: Arc<Frontier>,
    filter: Arc<UrlValidityFilter>,
    downloader: Arc<dyn Downloader>,
    running: Arc<AtomicBool>,
}

impl Crawler {
    pub fn new(
        config: Arc<CrawlConfig>,
        frontier: Arc<Frontier>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        let filter = Arc::new(UrlValidityFilter::new(&config));
        Self {
            config,
            frontier,
            filter,
            downloader,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal the crawl loop to stop after in-flight workers settle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub async fn run(&self) -> CrawlSummary {
        let start = Instant::now();
        self.running.store(true, Ordering::Relaxed);

        let mut in_flight = JoinSet::new();
        let max_workers = self.config.workers;

        let mut processed = 0usize;
        let mut discovered = 0usize;

        loop {
            if !self.running.load(Ordering::Relaxed) {
                break;
            }

            // Fill the worker pool.
            while in_flight.len() < max_workers {
                match self.frontier.get_next() {
                    Some(url) => {
                        let worker = self.clone();
                        in_flight.spawn(async move { worker.crawl_step(url).await });
                    }
                    None => break,
                }
            }

            // Quiescence: nothing queued and nothing that could enqueue.
            if in_flight.is_empty() {
                if self.frontier.is_empty() {
                    tracing::info!("Crawl complete: frontier empty and no work in flight");
                    break;
                }
                continue;
            }

            if let Some(joined) = in_flight.join_next().await {
                match joined {
                    Ok(outcome) => {
                        processed += 1;
                        discovered += outcome.admitted;

                        if let Some(error) = outcome.fetch_error {
                            tracing::warn!("{} - {}", outcome.url, error);
                        }
                        if processed % PROGRESS_INTERVAL == 0 {
                            match self.frontier.stats() {
                                Ok(stats) => {
                                    tracing::info!("Progress: {} processed | {}", processed, stats)
                                }
                                Err(e) => tracing::warn!("Failed to read frontier stats: {}", e),
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("Worker join error: {}", e);
                    }
                }
            }
        }

        // Drain workers still running after a stop signal.
        while let Some(joined) = in_flight.join_next().await {
            if let Ok(outcome) = joined {
                processed += 1;
                discovered += outcome.admitted;
            }
        }

        CrawlSummary {
            processed,
            discovered,
            duration_secs: start.elapsed().as_secs(),
        }
    }

    /// One crawl step: fetch, extract, filter, admit, complete.
    async fn crawl_step(&self, url: String) -> StepOutcome {
        let response = self.downloader.fetch(&url).await;
        let fetch_error = response.error.clone();

        let reports = self.frontier.reports();
        let candidates = extract_links(&url, &response, &reports);

        let mut admitted = 0usize;
        for candidate in candidates {
            match self
                .filter
                .is_valid(&candidate, &url, &self.frontier, self.downloader.as_ref())
                .await
            {
                Ok(true) => {
                    if let Err(e) = self.frontier.add_url(&candidate, Some(&url)) {
                        tracing::error!("Failed to add {}: {}", candidate, e);
                    } else {
                        admitted += 1;
                    }
                }
                Ok(false) => {}
                // Malformed candidate: already logged, drop it and move on.
                Err(_) => {}
            }
        }

        if let Err(e) = self.frontier.mark_complete(&url) {
            tracing::error!("Failed to mark {} complete: {}", url, e);
        }

        StepOutcome {
            url,
            admitted,
            fetch_error,
        }
    }
}
