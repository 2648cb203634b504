//! Scraper configuration.
//!
//! Everything the pipeline needs to know about its target (listing URL,
//! pagination parameter, selectors) and its pacing lives in
//! [`ScraperConfig`]. Every field has a default matching the Saint Petersburg
//! real-estate section of Avito, so the binary runs without a config file; a
//! YAML file passed with `--config` overrides any subset of the fields.
//!
//! ```yaml
//! base_url: "https://www.avito.ru/moskva/nedvizhimost"
//! max_retries: 5
//! pacing:
//!   between_pages: { min_ms: 3000, max_ms: 6000 }
//! ```

use crate::document::validate_selector;
use crate::pacing::DelayWindow;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.avito.ru/sankt-peterburg/nedvizhimost";
pub const DEFAULT_PAGE_PARAM: &str = "p";
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// CSS selectors locating a listing and its fields.
///
/// `listing` selects whole fragments on a page; the other four are evaluated
/// inside one fragment. Listings are found by the `data-marker` attribute
/// because the site's class names are generated and change between deploys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub listing: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            listing: r#"div[data-marker="item"]"#.to_string(),
            title: r#"h3[itemprop="name"]"#.to_string(),
            price: r#"[data-marker="item-price"]"#.to_string(),
            location: r#"[data-marker="item-address"]"#.to_string(),
            link: r#"a[data-marker="item-title"]"#.to_string(),
        }
    }
}

impl ListingSelectors {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("listing", self.listing.as_str()),
            ("title", self.title.as_str()),
            ("price", self.price.as_str()),
            ("location", self.location.as_str()),
            ("link", self.link.as_str()),
        ]
        .into_iter()
    }
}

/// Delay windows for the three places the pipeline pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Backoff between fetch attempts.
    pub retry: DelayWindow,
    /// Politeness pause between listings of one page.
    pub between_listings: DelayWindow,
    /// Pause between pages.
    pub between_pages: DelayWindow,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            retry: DelayWindow::from_millis(2_000, 5_000),
            between_listings: DelayWindow::from_millis(500, 1_500),
            between_pages: DelayWindow::from_millis(2_000, 4_000),
        }
    }
}

impl PacingConfig {
    /// No pauses at all. Used by tests.
    pub const fn disabled() -> Self {
        let zero = DelayWindow::from_millis(0, 0);
        Self {
            retry: zero,
            between_listings: zero,
            between_pages: zero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Listing URL without the page parameter.
    pub base_url: String,
    /// Query parameter carrying the page number.
    pub page_param: String,
    /// Total fetch attempts per page, first one included.
    pub max_retries: usize,
    pub request_timeout_secs: u64,
    pub selectors: ListingSelectors,
    pub pacing: PacingConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            selectors: ListingSelectors::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load a YAML config file. Missing fields keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|e| match e {
            ConfigError::Yaml { source, .. } => ConfigError::Yaml {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        info!(base_url = %config.base_url, max_retries = config.max_retries, "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.listing_url()?;
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid(format!(
                "base_url {} has no host",
                self.base_url
            )));
        }
        if self.page_param.trim().is_empty() {
            return Err(ConfigError::Invalid("page_param must not be empty".into()));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        for (name, window) in [
            ("retry", self.pacing.retry),
            ("between_listings", self.pacing.between_listings),
            ("between_pages", self.pacing.between_pages),
        ] {
            if !window.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "pacing.{name}: min_ms {} exceeds max_ms {}",
                    window.min_ms, window.max_ms
                )));
            }
        }
        for (name, selector) in self.selectors.iter() {
            validate_selector(selector).map_err(|_| {
                ConfigError::Invalid(format!("selectors.{name}: cannot parse {selector:?}"))
            })?;
        }
        Ok(())
    }

    pub fn listing_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {}: {e}", self.base_url)))
    }

    /// Scheme, host, and port of the listing URL, used to absolutize links.
    pub fn origin(&self) -> Result<Url, ConfigError> {
        let origin = self.listing_url()?.origin().ascii_serialization();
        Url::parse(&origin)
            .map_err(|e| ConfigError::Invalid(format!("base_url {} has no origin: {e}", self.base_url)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScraperConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.pacing.retry, DelayWindow::from_millis(2_000, 5_000));
        assert_eq!(config.pacing.between_listings, DelayWindow::from_millis(500, 1_500));
        assert_eq!(config.pacing.between_pages, DelayWindow::from_millis(2_000, 4_000));
        assert_eq!(config.origin().unwrap().as_str(), "https://www.avito.ru/");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ScraperConfig::from_yaml(
            r#"
base_url: "https://www.avito.ru/moskva/nedvizhimost"
max_retries: 5
pacing:
  between_pages: { min_ms: 3000, max_ms: 6000 }
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://www.avito.ru/moskva/nedvizhimost");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.page_param, "p");
        assert_eq!(config.pacing.between_pages, DelayWindow::from_millis(3_000, 6_000));
        assert_eq!(config.pacing.retry, DelayWindow::from_millis(2_000, 5_000));
        assert_eq!(config.selectors, ListingSelectors::default());
    }

    #[test]
    fn test_rejects_zero_retries() {
        let err = ScraperConfig::from_yaml("max_retries: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ScraperConfig::from_yaml("request_timeout_secs: 0").unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = ScraperConfig::from_yaml(
            "pacing:\n  retry: { min_ms: 5000, max_ms: 2000 }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("pacing.retry"));
    }

    #[test]
    fn test_rejects_bad_selector_and_url() {
        let err = ScraperConfig::from_yaml("selectors:\n  title: \"h3[[\"\n").unwrap_err();
        assert!(err.to_string().contains("selectors.title"));

        let err = ScraperConfig::from_yaml("base_url: \"not a url\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_param: page\nrequest_timeout_secs: 10").unwrap();
        let config = ScraperConfig::load(file.path()).unwrap();
        assert_eq!(config.page_param, "page");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScraperConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_origin_keeps_port() {
        let config = ScraperConfig {
            base_url: "http://127.0.0.1:8080/listings".to_string(),
            ..ScraperConfig::default()
        };
        assert_eq!(config.origin().unwrap().as_str(), "http://127.0.0.1:8080/");
    }
}
