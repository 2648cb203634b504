//! Error types for the fetch-and-parse pipeline.
//!
//! Every failure the core can produce is a [`ScrapeError`]. Only the fetcher
//! hands one back to its caller; the page scraper and the listing extractor
//! log and absorb theirs so a bad listing or a bad page never aborts a run.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0} returned an empty body")]
    EmptyBody(String),

    /// The selector string could not be parsed by the document engine.
    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("listing has no title element")]
    MissingTitle,

    #[error("link element has no href attribute")]
    MissingHref,

    #[error("could not build a URL from {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

impl ScrapeError {
    /// Failures that come from the network side and are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::Http { .. } | ScrapeError::Status { .. })
    }
}
