use chrono::{DateTime, FixedOffset, Local};
use clap::Parser;
use listing_scraper::cli::Cli;
use listing_scraper::outputs::csv;
use listing_scraper::utils::ensure_writable_dir;
use listing_scraper::{HttpListingScraper, ScraperConfig};
use std::error::Error;
use tracing::{Instrument, debug, error, info, info_span};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let run_timestamp: DateTime<FixedOffset> = args
        .run_timestamp
        .unwrap_or_else(|| Local::now().fixed_offset());
    let span = info_span!("run", run = %run_timestamp.format("%Y%m%d_%H%M%S"), pages = args.pages);

    async move {
        info!("listing_scraper starting up");

        let config = match &args.config {
            Some(path) => ScraperConfig::load(path)?,
            None => ScraperConfig::default(),
        };
        info!(base_url = %config.base_url, "Using scraper configuration");

        // Fail before spending minutes on the network if the output can't be written.
        if let Err(e) = ensure_writable_dir(&args.output_dir).await {
            error!(
                path = %args.output_dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }

        let scraper = HttpListingScraper::from_config(config)?;
        let listings = scraper.scrape_listings(args.pages).await;

        let path = csv::write_listings(&listings, &args.output_dir, &run_timestamp).await?;
        info!(count = listings.len(), path = %path.display(), "Saved listings");

        let elapsed = start_time.elapsed();
        info!(
            ?elapsed,
            secs = elapsed.as_secs(),
            millis = elapsed.subsec_millis(),
            "Execution complete"
        );
        Ok::<(), Box<dyn Error>>(())
    }
    .instrument(span)
    .await
}
