//! Data models for scraped listings.
//!
//! A [`Listing`] is built once by the listing extractor and never mutated
//! afterwards. Page and run results are plain `Vec<Listing>` values in the
//! order the listings appeared on the site.

use chrono::{DateTime, Local};
use serde::Serialize;

/// Placeholder stored in any field whose element could not be located.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column order of the tabular output. Matches the field order of [`Listing`].
pub const CSV_COLUMNS: [&str; 5] = ["title", "price", "location", "link", "scraped_at"];

/// One classified ad as extracted from a listing page.
///
/// All five fields are always populated. Missing price, location, or link is
/// represented by [`NOT_AVAILABLE`], never by an empty value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    /// Headline of the ad. Always present; a fragment without one is skipped.
    pub title: String,
    /// Price text as shown on the site, currency included.
    pub price: String,
    /// Address or district text.
    pub location: String,
    /// Absolute URL of the ad page.
    pub link: String,
    /// Moment the fragment was extracted.
    pub scraped_at: DateTime<Local>,
}

impl Listing {
    /// True when every field except the title fell back to the sentinel.
    pub fn is_title_only(&self) -> bool {
        self.price == NOT_AVAILABLE && self.location == NOT_AVAILABLE && self.link == NOT_AVAILABLE
    }
}
