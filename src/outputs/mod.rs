//! Output generation for scraped listings.
//!
//! # Submodules
//!
//! - [`csv`]: Writes one run's listings to a timestamped CSV file
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── avito_listings_20250506_060000.csv
//! └── avito_listings_20250507_060000.csv
//! ```

pub mod csv;
