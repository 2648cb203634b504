//! Command-line interface definitions.
//!
//! The scheduler invokes the binary once per run. Everything has a default,
//! so a bare `listing_scraper` scrapes five pages into `./data`.

use chrono::{DateTime, FixedOffset};
use clap::Parser;

/// Command-line arguments for one scraping run.
///
/// # Examples
///
/// ```sh
/// # Default target, five pages, CSV into ./data
/// listing_scraper
///
/// # What a daily scheduler entry typically passes
/// listing_scraper -o /opt/scraper/data -p 5 --run-timestamp 2025-05-06T06:00:00+03:00
///
/// # Another city or category via a config file
/// listing_scraper -c moskva.yaml -p 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory the timestamped CSV file is written to
    #[arg(short, long, env = "LISTINGS_OUTPUT_DIR", default_value = "data")]
    pub output_dir: String,

    /// Number of result pages to scrape, starting at page 1
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Optional path to a YAML config file overriding target URL, selectors, and pacing
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run timestamp (RFC 3339) used to name the output file; defaults to now
    #[arg(long, value_parser = parse_run_timestamp)]
    pub run_timestamp: Option<DateTime<FixedOffset>>,
}

fn parse_run_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
