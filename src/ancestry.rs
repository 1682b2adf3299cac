//! Parent-chain walking for the trap heuristics.

use crate::frontier::Frontier;
use crate::url_utils::normalize;

/// Collect up to `n` URLs of the ancestor chain starting at `url` itself and
/// following parent pointers toward a seed.
///
/// A URL that was never added to the frontier degrades gracefully to just
/// `[url]`: trap checks run on candidates before they are persisted, so an
/// unknown URL is expected, not an error.
pub fn ancestors_of(frontier: &Frontier, url: &str, n: usize) -> Vec<String> {
    let normalized = normalize(url);
    let mut chain = vec![normalized.clone()];
    if n <= 1 || !frontier.exists(&normalized).unwrap_or(false) {
        return chain;
    }

    let mut current = frontier.get_parent(&normalized).ok().flatten();
    while let Some(parent) = current {
        if chain.len() >= n {
            break;
        }
        // Defend against malformed parent loops in old store data.
        if chain.contains(&parent) {
            break;
        }
        current = frontier.get_parent(&parent).ok().flatten();
        chain.push(parent);
    }

    chain
}
