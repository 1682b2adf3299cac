pub mod ancestry;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod extractor;
pub mod filter;
pub mod frontier;
pub mod info_value;
pub mod logging;
pub mod network;
pub mod page;
pub mod report;
pub mod state;
pub mod tokens;
pub mod url_utils;

// Re-export main types for library usage
pub use config::CrawlConfig;
pub use crawler::{CrawlSummary, Crawler};
pub use extractor::extract_links;
pub use filter::UrlValidityFilter;
pub use frontier::{Frontier, FrontierError, FrontierStats};
pub use info_value::{information_ratio, information_value};
pub use network::{Downloader, FetchResponse, HttpClient};
pub use page::ParsedPage;
pub use state::{FrontierStore, UrlRecord};
pub use tokens::tokenize;
