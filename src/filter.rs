//! URL admission policy: scheme/extension/domain rules plus the trap
//! heuristics that keep the crawl out of calendars, repeated-directory loops,
//! and low-content boilerplate.
//!
//! Checks are ordered cheapest first and short-circuit, so the network fetch
//! behind the information-value check only happens for candidates that
//! survived everything else.

use regex::Regex;
use url::Url;

use crate::ancestry::ancestors_of;
use crate::config::CrawlConfig;
use crate::frontier::Frontier;
use crate::info_value::information_value;
use crate::network::Downloader;
use crate::page::ParsedPage;
use crate::url_utils::normalize;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("malformed url '{url}': {source}")]
    Malformed {
        url: String,
        source: url::ParseError,
    },
}

pub struct UrlValidityFilter {
    allowed_domains: Vec<String>,
    blacklisted_extensions: Vec<String>,
    blacklisted_patterns: Vec<String>,
    ancestry_depth: usize,
    calendar_match_threshold: usize,
    info_value_threshold: f64,
    /// Trailing `/[day]/[month]/[year]` as produced by date-paginated calendars.
    calendar_re: Regex,
    /// Digit runs, stripped to compare numerically-varying URLs.
    digits_re: Regex,
}

impl UrlValidityFilter {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            allowed_domains: config.allowed_domains.clone(),
            blacklisted_extensions: config.blacklisted_extensions.clone(),
            blacklisted_patterns: config.blacklisted_patterns.clone(),
            ancestry_depth: config.ancestry_depth,
            calendar_match_threshold: config.calendar_match_threshold,
            info_value_threshold: config.info_value_threshold,
            calendar_re: Regex::new(r"/?[0-9]{0,2}/[0-9]{0,2}/[0-9]{4}/?$")
                .expect("invalid calendar regex"),
            digits_re: Regex::new(r"[0-9]+").expect("invalid digits regex"),
        }
    }

    /// Checks 1-4: scheme, extension/pattern blacklist, domain whitelist,
    /// repeated-path trap. No network, no frontier; safe for startup
    /// reconstruction of the pending queue.
    ///
    /// A candidate that does not parse as a URL is a caller-visible error,
    /// not a silent rejection.
    pub fn passes_cheap_checks(&self, url: &str) -> Result<bool, FilterError> {
        let parsed = Url::parse(url).map_err(|source| {
            tracing::error!("Malformed url '{}': {}", url, source);
            FilterError::Malformed {
                url: url.to_string(),
                source,
            }
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Ok(false);
        }

        let path = parsed.path().to_lowercase();
        if self
            .blacklisted_extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{}", ext)))
        {
            return Ok(false);
        }
        if self
            .blacklisted_patterns
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
        {
            return Ok(false);
        }

        let Some(host) = parsed.host_str() else {
            return Ok(false);
        };
        let host = host.to_lowercase();
        if !self.allowed_domains.iter().any(|suffix| {
            host.ends_with(suffix.as_str()) || host == suffix.trim_start_matches('.')
        }) {
            return Ok(false);
        }

        if Self::has_repeated_segment(&path) {
            return Ok(false);
        }

        Ok(true)
    }

    /// Repeated-path trap: any path segment occurring three or more times.
    fn has_repeated_segment(path: &str) -> bool {
        let mut counts = std::collections::HashMap::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let count = counts.entry(segment).or_insert(0usize);
            *count += 1;
            if *count >= 3 {
                return true;
            }
        }
        false
    }

    /// Check 5: both URLs end in a `/[dd]/[mm]/[yyyy]` tail and agree on
    /// everything before it, the signature of date-paginated calendars.
    fn is_calendar_sibling(&self, candidate: &str, current: &str) -> bool {
        if !self.calendar_re.is_match(candidate) || !self.calendar_re.is_match(current) {
            return false;
        }
        self.calendar_re.replace(candidate, "") == self.calendar_re.replace(current, "")
    }

    /// Check 6: stripping the query string collapses the candidate onto the
    /// page it was found on (`?page=N` self-loops).
    fn collapses_onto_current(candidate: &str, current: &str) -> bool {
        match candidate.find('?') {
            Some(pos) => normalize(&candidate[..pos]) == normalize(current),
            None => false,
        }
    }

    /// Check 7: walk the current page's ancestors; reject a candidate that is
    /// already among them, or whose digit-stripped form recurs among more
    /// than `calendar_match_threshold` of them (numeric pagination).
    fn passes_ancestry_check(
        &self,
        candidate_normalized: &str,
        current: &str,
        frontier: &Frontier,
    ) -> bool {
        let ancestors = ancestors_of(frontier, current, self.ancestry_depth);

        if ancestors.iter().any(|a| a == candidate_normalized) {
            tracing::debug!("Skipping {}: existed in ancestors", candidate_normalized);
            return false;
        }

        let stripped = self.digits_re.replace_all(candidate_normalized, "");
        let matches = ancestors
            .iter()
            .filter(|a| self.digits_re.replace_all(a, "") == stripped)
            .count();
        if matches > self.calendar_match_threshold {
            tracing::debug!(
                "Skipping {}: repeated number pattern in {} ancestors",
                candidate_normalized,
                matches
            );
            return false;
        }

        true
    }

    /// Full admission decision for a candidate discovered on `current`.
    ///
    /// Runs checks 1-7 without the network, then the information-value fetch
    /// last. Fetch failures fail closed.
    pub async fn is_valid(
        &self,
        candidate: &str,
        current: &str,
        frontier: &Frontier,
        downloader: &dyn Downloader,
    ) -> Result<bool, FilterError> {
        if !self.passes_cheap_checks(candidate)? {
            return Ok(false);
        }

        if self.is_calendar_sibling(candidate, current) {
            tracing::debug!("Skipping {}: common calendar format with {}", candidate, current);
            return Ok(false);
        }
        if Self::collapses_onto_current(candidate, current) {
            tracing::debug!("Skipping {}: same as {} without query", candidate, current);
            return Ok(false);
        }

        let candidate_normalized = normalize(candidate);
        if !self.passes_ancestry_check(&candidate_normalized, current, frontier) {
            return Ok(false);
        }

        let response = downloader.fetch(candidate).await;
        if !response.has_content() {
            tracing::debug!(
                "Skipping {}: fetch failed or empty ({:?})",
                candidate,
                response.error
            );
            return Ok(false);
        }

        let score = match response.text() {
            Some(text) => information_value(&ParsedPage::parse(&text)),
            None => 0.0,
        };
        if score < self.info_value_threshold {
            tracing::debug!(
                "Skipping {}: information value {:.3} below threshold",
                candidate,
                score
            );
            return Ok(false);
        }

        Ok(true)
    }
}
