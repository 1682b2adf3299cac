//! Information-value scoring: how much of a page is text versus markup.
//! Low-scoring pages are boilerplate (navigation shells, empty calendars)
//! and are not worth admitting into the frontier.

use crate::page::ParsedPage;

/// `tokens / (tokens + tags)` with a zero-safe denominator.
pub fn information_ratio(token_count: usize, tag_count: usize) -> f64 {
    let total = token_count + tag_count;
    if total == 0 {
        0.0
    } else {
        token_count as f64 / total as f64
    }
}

/// Score a parsed page in `[0, 1]`; higher means denser text content.
pub fn information_value(page: &ParsedPage) -> f64 {
    information_ratio(page.text_tokens().len(), page.tag_count())
}
