use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use ics_crawler::cli::{Cli, Commands};
use ics_crawler::config::{ConfigError, CrawlConfig};
use ics_crawler::crawler::Crawler;
use ics_crawler::frontier::{Frontier, FrontierError};
use ics_crawler::logging::init_logging;
use ics_crawler::network::{FetchError, HttpClient};
use ics_crawler::state::{FrontierStore, StateError};

#[derive(Error, Debug)]
pub enum MainError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] FrontierError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Network error: {0}")]
    Network(#[from] FetchError),

    #[error("Logging error: {0}")]
    Logging(String),
}

fn load_config(path: Option<&str>) -> Result<CrawlConfig, ConfigError> {
    match path {
        Some(p) => CrawlConfig::load(Path::new(p)),
        None => Ok(CrawlConfig::default()),
    }
}

async fn run_crawl(
    config_path: Option<String>,
    restart: bool,
    workers: Option<usize>,
) -> Result<(), MainError> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(workers) = workers {
        config.workers = workers;
    }
    config.validate()?;

    init_logging(&config.log_dir).map_err(|e| MainError::Logging(e.to_string()))?;

    let config = Arc::new(config);
    let frontier = Arc::new(Frontier::initialize(&config, restart)?);
    let downloader = Arc::new(HttpClient::new(&config.user_agent, config.timeout_secs)?);

    let crawler = Crawler::new(Arc::clone(&config), Arc::clone(&frontier), downloader);

    // Ctrl+C stops the loop; workers settle and state is already durable.
    let stopper = crawler.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, finishing in-flight work");
            stopper.stop();
        }
    });

    let summary = crawler.run().await;
    let stats = frontier.stats()?;
    println!(
        "Processed {} urls, admitted {}, in {}s | {}",
        summary.processed, summary.discovered, summary.duration_secs, stats
    );

    Ok(())
}

fn run_stats(config_path: Option<String>) -> Result<(), MainError> {
    let config = load_config(config_path.as_deref())?;
    let store = FrontierStore::open(&config.save_path, false)?;

    let total = store.record_count()?;
    let completed = store.completed_count()?;
    println!(
        "{}: {} urls discovered, {} completed, {} incomplete",
        store.path().display(),
        total,
        completed,
        total - completed
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Crawl {
            config,
            restart,
            workers,
        } => run_crawl(config, restart, workers).await?,
        Commands::Stats { config } => run_stats(config)?,
    }

    Ok(())
}
