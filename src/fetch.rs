//! Page fetching with bounded retries.
//!
//! # Architecture
//!
//! - [`Fetch`]: async "give me the body of this URL"
//! - [`HttpFetcher`]: one `reqwest` GET with fresh randomized headers
//! - [`RetryFetch`]: decorator adding an attempt cap and jittered backoff to
//!   any [`Fetch`]
//!
//! # Retry Strategy
//!
//! Transport errors and non-success statuses are retried. Between attempts
//! the decorator pauses for a duration picked by its [`DelayStrategy`] inside
//! the configured retry window (2-5 s by default). After `max_retries`
//! attempts the last error is returned unchanged.

use crate::error::{Result, ScrapeError};
use crate::headers::headers;
use crate::pacing::{DelayStrategy, DelayWindow, pause};
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

/// Something that can retrieve the raw text of a page.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}

/// Single-attempt HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ScrapeError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let http_err = |source: reqwest::Error| ScrapeError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .headers(headers())
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(http_err)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Adds an attempt cap and backoff to any [`Fetch`] implementation.
pub struct RetryFetch<T, D> {
    inner: T,
    /// Total attempts, the first one included.
    max_retries: usize,
    backoff: DelayWindow,
    delay: D,
}

impl<T, D> RetryFetch<T, D>
where
    T: Fetch,
    D: DelayStrategy,
{
    /// A `max_retries` of 0 is treated as 1: the URL is always tried once.
    pub fn new(inner: T, max_retries: usize, backoff: DelayWindow, delay: D) -> Self {
        Self {
            inner,
            max_retries: max_retries.max(1),
            backoff,
            delay,
        }
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

impl<T, D> fmt::Debug for RetryFetch<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .finish()
    }
}

impl<T, D> Fetch for RetryFetch<T, D>
where
    T: Fetch,
    D: DelayStrategy,
{
    #[instrument(level = "info", skip(self), fields(max = self.max_retries))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            let e = match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            if !e.is_transient() || attempt >= self.max_retries {
                error!(
                    attempt,
                    max = self.max_retries,
                    elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                    error = %e,
                    "Fetch failed; giving up"
                );
                return Err(e);
            }

            warn!(attempt, max = self.max_retries, error = %e, "Fetch attempt failed; backing off");
            pause(&self.delay, self.backoff, "retry backoff").await;
        }
    }
}
