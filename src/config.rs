//! Crawl configuration: seeds, storage paths, domain policy, and trap
//! thresholds. Loaded from a TOML file with every field defaulted so a bare
//! `[crawl]`-less file (or no file at all) still yields a runnable config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// URLs seeding a fresh frontier.
    pub seed_urls: Vec<String>,
    /// redb file backing the frontier store.
    pub save_path: PathBuf,
    /// Append log of `(url, token_count)` rows for the report generator.
    pub url_log_path: PathBuf,
    /// Append log of page tokens, one page per line, for the report generator.
    pub word_log_path: PathBuf,
    /// Directory for tracing log files.
    pub log_dir: PathBuf,

    /// Host suffixes the crawl is allowed to visit.
    pub allowed_domains: Vec<String>,
    /// Path extensions that are never crawled (media, archives, documents).
    pub blacklisted_extensions: Vec<String>,
    /// Substrings anywhere in the path that disqualify a URL.
    pub blacklisted_patterns: Vec<String>,

    /// How many ancestors to walk for the ancestry trap check.
    pub ancestry_depth: usize,
    /// Reject a candidate whose digit-stripped form matches more than this
    /// many ancestors.
    pub calendar_match_threshold: usize,
    /// Minimum `tokens / (tokens + tags)` ratio for admission.
    pub info_value_threshold: f64,

    pub user_agent: String,
    pub timeout_secs: u64,
    pub workers: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_urls: vec![
                "https://www.ics.uci.edu".to_string(),
                "https://www.cs.uci.edu".to_string(),
                "https://www.informatics.uci.edu".to_string(),
                "https://www.stat.uci.edu".to_string(),
            ],
            save_path: PathBuf::from("./data/frontier.redb"),
            url_log_path: PathBuf::from("./data/url_counts.csv"),
            word_log_path: PathBuf::from("./data/words.txt"),
            log_dir: PathBuf::from("./data/logs"),
            allowed_domains: vec![
                ".ics.uci.edu".to_string(),
                ".cs.uci.edu".to_string(),
                ".informatics.uci.edu".to_string(),
                ".stat.uci.edu".to_string(),
            ],
            blacklisted_extensions: [
                "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid",
                "mp2", "mp3", "mp4", "wav", "avi", "mov", "mpg", "mpeg", "ram", "m4v", "mkv",
                "ogg", "ogv", "pdf", "ps", "eps", "tex", "ppt", "pptx", "doc", "docx", "xls",
                "xlsx", "names", "data", "dat", "exe", "bz2", "tar", "msi", "bin", "7z", "psd",
                "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx", "mso", "arff", "rtf",
                "jar", "csv", "json", "java", "apk", "img", "war", "xml", "rm", "smil", "wmv",
                "swf", "wma", "zip", "rar", "gz", "txt", "vmdk", "php", "ppsx",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            blacklisted_patterns: vec![
                "json".to_string(),
                "xmlrpc".to_string(),
                "mailto".to_string(),
                ".php".to_string(),
            ],
            ancestry_depth: 50,
            calendar_match_threshold: 10,
            info_value_threshold: 1.0 / 3.0,
            user_agent: "IcsCrawler/0.1".to_string(),
            timeout_secs: 20,
            workers: 8,
        }
    }
}

impl CrawlConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: CrawlConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields, collecting every problem so the user can fix them
    /// in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.seed_urls.is_empty() {
            errors.push("seed_urls must not be empty".to_string());
        }
        if self.allowed_domains.is_empty() {
            errors.push("allowed_domains must not be empty".to_string());
        }
        if self.ancestry_depth == 0 {
            errors.push("ancestry_depth must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.info_value_threshold) {
            errors.push("info_value_threshold must be between 0.0 and 1.0".to_string());
        }
        if self.workers == 0 {
            errors.push("workers must be positive".to_string());
        }
        if self.timeout_secs == 0 {
            errors.push("timeout_secs must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("; ")))
        }
    }
}
