//! CSV output for a run's listings.
//!
//! One file per run, named after the run timestamp supplied by the scheduler
//! (or the current time), UTF-8, header row always present.

use crate::models::{CSV_COLUMNS, Listing};
use ::csv::WriterBuilder;
use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const FILE_PREFIX: &str = "avito_listings";

/// `avito_listings_<YYYYmmdd_HHMMSS>.csv`
pub fn output_filename<Tz>(run_timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}_{}.csv", FILE_PREFIX, run_timestamp.format("%Y%m%d_%H%M%S"))
}

/// Serialize listings to CSV bytes with a header row, in [`CSV_COLUMNS`] order.
pub fn to_csv_bytes(listings: &[Listing]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(CSV_COLUMNS)?;
    for listing in listings {
        wtr.serialize(listing)?;
    }
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

/// Write `listings` to `<output_dir>/avito_listings_<timestamp>.csv`.
///
/// The directory is created if needed. Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.as_ref().display(), count = listings.len()))]
pub async fn write_listings<Tz>(
    listings: &[Listing],
    output_dir: impl AsRef<Path>,
    run_timestamp: &DateTime<Tz>,
) -> Result<PathBuf, Box<dyn Error>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).await?;

    let path = output_dir.join(output_filename(run_timestamp));
    let bytes = to_csv_bytes(listings)?;

    info!(path = %path.display(), bytes = bytes.len(), "Writing CSV");
    fs::write(&path, bytes).await?;
    info!(path = %path.display(), "Saved listings");
    Ok(path)
}
