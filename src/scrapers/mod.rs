//! The fetch-and-parse pipeline.
//!
//! A [`ListingScraper`] owns everything one run needs: the configuration, a
//! [`Fetch`] implementation (normally a [`RetryFetch`] around an
//! [`HttpFetcher`]), a [`DelayStrategy`] for politeness pacing, and a
//! [`DocumentQuery`] engine. Work is split across three submodules:
//!
//! | Module | Entry point | Scope |
//! |--------|-------------|-------|
//! | [`listing`] | [`listing::extract_listing`] | one listing fragment |
//! | [`page`] | [`ListingScraper::scrape_page`] | one result page |
//! | [`run`] | [`ListingScraper::scrape_listings`] | pages `1..=n` |
//!
//! Pages and listings are processed strictly one after another. A failed
//! listing is skipped, a failed page yields no listings, and the run itself
//! never fails.

pub mod listing;
pub mod page;
pub mod run;

use crate::config::{ConfigError, ScraperConfig};
use crate::document::{DocumentQuery, HtmlQuery};
use crate::fetch::{Fetch, HttpFetcher, RetryFetch};
use crate::pacing::{DelayStrategy, JitteredDelay};
use std::fmt;
use url::Url;

pub struct ListingScraper<F, D, Q = HtmlQuery> {
    config: ScraperConfig,
    origin: Url,
    fetcher: F,
    delay: D,
    query: Q,
}

/// The production pipeline: HTTP with retries, random pacing, HTML parsing.
pub type HttpListingScraper = ListingScraper<RetryFetch<HttpFetcher, JitteredDelay>, JitteredDelay>;

impl<F, D> ListingScraper<F, D, HtmlQuery>
where
    F: Fetch,
    D: DelayStrategy,
{
    pub fn new(config: ScraperConfig, fetcher: F, delay: D) -> Result<Self, ConfigError> {
        Self::with_query(config, fetcher, delay, HtmlQuery)
    }
}

impl<F, D, Q> ListingScraper<F, D, Q>
where
    F: Fetch,
    D: DelayStrategy,
    Q: DocumentQuery,
{
    /// Build a scraper around a custom document engine.
    pub fn with_query(
        config: ScraperConfig,
        fetcher: F,
        delay: D,
        query: Q,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let origin = config.origin()?;
        Ok(Self {
            config,
            origin,
            fetcher,
            delay,
            query,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

impl HttpListingScraper {
    /// Wire up the real HTTP client and jittered delays from `config`.
    pub fn from_config(config: ScraperConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http = HttpFetcher::new(config.request_timeout())?;
        let fetcher = RetryFetch::new(http, config.max_retries, config.pacing.retry, JitteredDelay);
        Ok(Self::new(config, fetcher, JitteredDelay)?)
    }
}

impl<F, D, Q> fmt::Debug for ListingScraper<F, D, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingScraper")
            .field("base_url", &self.config.base_url)
            .field("origin", &self.origin.as_str())
            .field("max_retries", &self.config.max_retries)
            .finish()
    }
}
