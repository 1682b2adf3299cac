//! Append logs consumed by the offline report generator: a `(url, tokens)`
//! row per page and a line of whitespace-joined tokens per page. These are
//! side outputs only; crawl correctness never depends on them.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub struct ReportLogs {
    url_log: Mutex<File>,
    word_log: Mutex<File>,
}

impl ReportLogs {
    /// Open both logs, creating them if absent and truncating on restart.
    pub fn provision(
        url_log_path: &Path,
        word_log_path: &Path,
        restart: bool,
    ) -> std::io::Result<Self> {
        Ok(Self {
            url_log: Mutex::new(Self::open_log(url_log_path, restart)?),
            word_log: Mutex::new(Self::open_log(word_log_path, restart)?),
        })
    }

    fn open_log(path: &Path, restart: bool) -> std::io::Result<File> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if restart && path.exists() {
            tracing::info!("Found log file {}, truncating it", path.display());
        } else if !path.exists() {
            tracing::info!("Did not find log file {}, creating it", path.display());
        }
        OpenOptions::new()
            .create(true)
            .append(!restart)
            .write(true)
            .truncate(restart)
            .open(path)
    }

    /// Append one page's tokens and its `(url, token_count)` row.
    pub fn record_page(&self, url: &str, tokens: &[String]) -> std::io::Result<()> {
        if !tokens.is_empty() {
            let mut word_log = self.word_log.lock();
            writeln!(word_log, "{}", tokens.join(" "))?;
            word_log.flush()?;
        }

        let mut url_log = self.url_log.lock();
        writeln!(url_log, "{},{}", url, tokens.len())?;
        url_log.flush()?;
        Ok(())
    }
}
