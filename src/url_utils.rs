//! URL normalization, hashing, and candidate resolution shared across modules.

use sha2::{Digest, Sha256};
use url::Url;

/// Strip the `#fragment` portion of a URL, if any.
pub fn defragment(url: &str) -> &str {
    match url.find('#') {
        Some(pos) => &url[..pos],
        None => url,
    }
}

/// Strip the `?query` portion of a URL, if any.
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(pos) => &url[..pos],
        None => url,
    }
}

/// Canonicalize a URL so equivalent spellings dedup to one record.
///
/// Drops the fragment, trims the trailing slash, and case-folds, so
/// `https://Example.edu/Page/#top` and `https://example.edu/page` hash
/// identically.
pub fn normalize(url: &str) -> String {
    let defragged = defragment(url);
    defragged.trim_end_matches('/').to_lowercase()
}

/// Stable on-disk key for a normalized URL.
///
/// SHA-256 hex rather than `DefaultHasher`: the key is persisted, so it must
/// be identical across processes and Rust versions.
pub fn url_hash(normalized_url: &str) -> String {
    hex::encode(Sha256::digest(normalized_url.as_bytes()))
}

pub fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

/// Resolve a raw href against the page it was found on.
///
/// Returns `None` for hrefs that should be discarded outright: empty strings
/// and `///`-prefixed references (local file paths). `//`-prefixed references
/// inherit the base URL's scheme; everything else follows standard URL
/// joining.
pub fn resolve_candidate(raw: &str, base_url: &str) -> Option<String> {
    let raw = defragment(raw.trim());
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("///") {
        return None;
    }
    if raw.starts_with("//") {
        let scheme = Url::parse(base_url).ok()?.scheme().to_string();
        return Some(format!("{}:{}", scheme, raw));
    }
    if let Ok(absolute) = Url::parse(raw) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(base_url).ok()?;
    base.join(raw).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_fragment_and_slash() {
        assert_eq!(
            normalize("https://www.ics.uci.edu/page/#section"),
            "https://www.ics.uci.edu/page"
        );
        assert_eq!(
            normalize("HTTPS://WWW.ICS.UCI.EDU/Page"),
            "https://www.ics.uci.edu/page"
        );
    }

    #[test]
    fn test_equivalent_urls_hash_identically() {
        let a = url_hash(&normalize("https://www.ics.uci.edu/about/"));
        let b = url_hash(&normalize("https://www.ics.uci.edu/about#team"));
        assert_eq!(a, b);

        let c = url_hash(&normalize("https://www.ics.uci.edu/other"));
        assert_ne!(a, c);
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://www.ics.uci.edu/list?page=2"),
            "https://www.ics.uci.edu/list"
        );
        assert_eq!(
            strip_query("https://www.ics.uci.edu/list"),
            "https://www.ics.uci.edu/list"
        );
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(
            extract_host("https://www.ics.uci.edu/path"),
            Some("www.ics.uci.edu".to_string())
        );
        assert_eq!(extract_host("not a url"), None);
    }

    #[test]
    fn test_resolve_relative_reference() {
        assert_eq!(
            resolve_candidate("/grad/apply", "https://www.ics.uci.edu/page"),
            Some("https://www.ics.uci.edu/grad/apply".to_string())
        );
        assert_eq!(
            resolve_candidate("sibling", "https://www.ics.uci.edu/dir/"),
            Some("https://www.ics.uci.edu/dir/sibling".to_string())
        );
    }

    #[test]
    fn test_resolve_scheme_relative_inherits_scheme() {
        assert_eq!(
            resolve_candidate("//www.cs.uci.edu/page", "https://www.ics.uci.edu"),
            Some("https://www.cs.uci.edu/page".to_string())
        );
        assert_eq!(
            resolve_candidate("//www.cs.uci.edu/page", "http://www.ics.uci.edu"),
            Some("http://www.cs.uci.edu/page".to_string())
        );
    }

    #[test]
    fn test_resolve_discards_file_paths_and_empties() {
        assert_eq!(
            resolve_candidate("///etc/passwd", "https://www.ics.uci.edu"),
            None
        );
        assert_eq!(resolve_candidate("", "https://www.ics.uci.edu"), None);
        assert_eq!(resolve_candidate("#top", "https://www.ics.uci.edu"), None);
    }

    #[test]
    fn test_resolve_keeps_absolute_urls() {
        assert_eq!(
            resolve_candidate("https://www.stat.uci.edu/x#frag", "https://www.ics.uci.edu"),
            Some("https://www.stat.uci.edu/x".to_string())
        );
    }
}
