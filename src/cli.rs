use clap::{Parser, Subcommand};

/// CLI entry point so users can control the crawler from the command line.
#[derive(Parser, Debug)]
#[command(name = "ics_crawler")]
#[command(about = "A trap-aware, resumable crawler for the UCI ICS subdomains")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a crawl, resuming saved state unless --restart is given.
    Crawl {
        #[arg(short, long, help = "Path to a TOML config file (defaults apply if omitted)")]
        config: Option<String>,

        #[arg(long, help = "Discard saved state and start over from the seed URLs")]
        restart: bool,

        #[arg(short, long, help = "Override the number of concurrent workers")]
        workers: Option<usize>,
    },

    /// Print frontier statistics from a saved crawl.
    Stats {
        #[arg(short, long, help = "Path to a TOML config file (defaults apply if omitted)")]
        config: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
