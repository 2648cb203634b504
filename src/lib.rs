//! # Listing Scraper
//!
//! Fetches paginated real-estate listing pages from a classifieds site,
//! extracts title, price, location, and link from every listing, and hands
//! the batch back for storage as a timestamped CSV.
//!
//! ## Architecture
//!
//! The pipeline runs strictly in sequence:
//! 1. **Run**: pages `1..=n`, paced between pages
//! 2. **Page**: fetch with retries, split into listing fragments, paced between listings
//! 3. **Listing**: extract the four fields, `"N/A"` for anything but the title
//!
//! Failures are absorbed as close to their source as possible: a bad listing
//! is skipped, a bad page contributes nothing, a run always completes.
//!
//! ```ignore
//! let config = ScraperConfig::default();
//! let listings = scrape_listings(config, 3).await?;
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod models;
pub mod outputs;
pub mod pacing;
pub mod scrapers;
pub mod utils;

pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use models::{Listing, NOT_AVAILABLE};
pub use scrapers::{HttpListingScraper, ListingScraper};

/// Scrape `num_pages` pages of the configured target over HTTP.
///
/// Only configuration problems are errors; fetch and parse failures are
/// logged and reduce the result instead.
pub async fn scrape_listings(
    config: ScraperConfig,
    num_pages: u32,
) -> core::result::Result<Vec<Listing>, Box<dyn std::error::Error>> {
    let scraper = HttpListingScraper::from_config(config)?;
    Ok(scraper.scrape_listings(num_pages).await)
}
