//! Link extraction from fetched pages: parse hyperlinks, defragment, resolve
//! against the page base URL, and dedup within the page. Also feeds the two
//! report logs as a side effect.

use std::collections::HashSet;

use crate::network::FetchResponse;
use crate::report::ReportLogs;
use crate::url_utils::{normalize, resolve_candidate, strip_query};
use crate::page::ParsedPage;

/// Extract candidate URLs from a fetch result.
///
/// Non-200 responses, transport errors, and empty bodies yield an empty list;
/// the caller treats those the same as a page with no links. Returned URLs
/// are stripped of their query string and normalized, so `?page=N` variants
/// of one path collapse into a single candidate. They are unique within the
/// page and never include the page's own URL.
pub fn extract_links(url: &str, response: &FetchResponse, reports: &ReportLogs) -> Vec<String> {
    if response.status != 200 {
        if response.status == 404 {
            tracing::info!("{} returned 404 not found", url);
        } else if let Some(error) = &response.error {
            tracing::info!("{} fetch failed: {}", url, error);
        } else {
            tracing::info!("{} returned status {}", url, response.status);
        }
        return Vec::new();
    }
    let Some(text) = response.text().filter(|t| !t.is_empty()) else {
        tracing::info!("{} has no data", url);
        return Vec::new();
    };

    let page = ParsedPage::parse(&text);

    // Report side effects; failures here must not disturb the crawl.
    let tokens = page.text_tokens();
    if let Err(e) = reports.record_page(url, &tokens) {
        tracing::warn!("Failed to write report logs for {}: {}", url, e);
    }

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(normalize(url));

    let mut candidates = Vec::new();
    for href in page.links() {
        let Some(resolved) = resolve_candidate(&href, url) else {
            tracing::debug!("Skipping href '{}': unresolvable or local file", href);
            continue;
        };
        // The bare URL is what gets recorded and crawled; a query variant of
        // the current page collapses into `seen` and is dropped here.
        let normalized = normalize(strip_query(&resolved));
        if seen.insert(normalized.clone()) {
            candidates.push(normalized);
        }
    }

    candidates
}
