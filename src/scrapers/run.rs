//! Multi-page aggregation.

use super::ListingScraper;
use crate::document::DocumentQuery;
use crate::fetch::Fetch;
use crate::models::Listing;
use crate::pacing::{DelayStrategy, pause};
use std::time::Instant;
use tracing::{info, instrument, warn};

impl<F, D, Q> ListingScraper<F, D, Q>
where
    F: Fetch,
    D: DelayStrategy,
    Q: DocumentQuery,
{
    /// Scrape pages `1..=num_pages` in order and concatenate their listings.
    ///
    /// Page order and the order of listings within a page are preserved.
    /// Pages that fail contribute nothing; the run always completes.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape_listings(&self, num_pages: u32) -> Vec<Listing> {
        let t0 = Instant::now();
        let mut all_listings = Vec::new();
        let mut empty_pages = Vec::new();

        for page in 1..=num_pages {
            if page > 1 {
                pause(&self.delay, self.config.pacing.between_pages, "between pages").await;
            }
            let listings = self.scrape_page(page).await;
            if listings.is_empty() {
                empty_pages.push(page);
            }
            all_listings.extend(listings);
        }

        if !empty_pages.is_empty() {
            warn!(?empty_pages, "Pages without listings in this run");
        }
        info!(
            pages = num_pages,
            listings = all_listings.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Finished scraping run"
        );
        all_listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::page::fixtures::{item, page};
    use crate::config::{PacingConfig, ScraperConfig};
    use crate::fetch::testing::ScriptedFetch;
    use crate::fetch::{HttpFetcher, RetryFetch};
    use crate::pacing::testing::RecordingDelay;
    use crate::pacing::{DelayWindow, NoDelay};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_url(n: u32) -> String {
        format!("https://www.avito.ru/sankt-peterburg/nedvizhimost?p={n}")
    }

    fn three_listings(prefix: &str) -> String {
        page(&[
            item(Some(&format!("{prefix} A")), Some("1 ₽"), Some(&format!("/{prefix}/a"))),
            item(Some(&format!("{prefix} B")), Some("2 ₽"), Some(&format!("/{prefix}/b"))),
            item(Some(&format!("{prefix} C")), None, None),
        ])
    }

    #[tokio::test]
    async fn test_failed_page_does_not_affect_others() {
        let html = three_listings("p1");
        let fetch = ScriptedFetch::new()
            .respond(&page_url(1), vec![Some(html.as_str())])
            .respond(&page_url(2), vec![None]);
        let config = ScraperConfig::default();
        let retry = RetryFetch::new(&fetch, config.max_retries, config.pacing.retry, NoDelay);
        let scraper = ListingScraper::new(config, retry, NoDelay).unwrap();

        let listings = scraper.scrape_listings(2).await;
        let titles: Vec<_> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["p1 A", "p1 B", "p1 C"]);
        assert_eq!(fetch.calls_to(&page_url(1)), 1);
        assert_eq!(fetch.calls_to(&page_url(2)), 3);
    }

    #[tokio::test]
    async fn test_pages_concatenated_in_order() {
        let p1 = three_listings("p1");
        let p2 = page(&[item(Some("p2 A"), None, Some("/p2/a"))]);
        let p3 = three_listings("p3");
        let fetch = ScriptedFetch::new()
            .respond(&page_url(1), vec![Some(p1.as_str())])
            .respond(&page_url(2), vec![Some(p2.as_str())])
            .respond(&page_url(3), vec![Some(p3.as_str())]);
        let delay = RecordingDelay::default();
        let scraper = ListingScraper::new(ScraperConfig::default(), &fetch, &delay).unwrap();

        let listings = scraper.scrape_listings(3).await;
        assert_eq!(listings.len(), 3 + 1 + 3);
        let titles: Vec<_> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(
            titles,
            ["p1 A", "p1 B", "p1 C", "p2 A", "p3 A", "p3 B", "p3 C"]
        );

        // Two pauses inside each three-item page, two between the three pages.
        let windows = delay.recorded();
        let between_pages = windows
            .iter()
            .filter(|w| **w == DelayWindow::from_millis(2_000, 4_000))
            .count();
        let between_listings = windows
            .iter()
            .filter(|w| **w == DelayWindow::from_millis(500, 1_500))
            .count();
        assert_eq!(between_pages, 2);
        assert_eq!(between_listings, 4);
    }

    #[tokio::test]
    async fn test_zero_pages_is_empty_run() {
        let fetch = ScriptedFetch::new();
        let scraper = ListingScraper::new(ScraperConfig::default(), &fetch, NoDelay).unwrap();
        assert!(scraper.scrape_listings(0).await.is_empty());
        assert!(fetch.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_every_page_failing_still_returns() {
        let fetch = ScriptedFetch::new();
        let config = ScraperConfig::default();
        let retry = RetryFetch::new(&fetch, 2, config.pacing.retry, NoDelay);
        let scraper = ListingScraper::new(config, retry, NoDelay).unwrap();
        assert!(scraper.scrape_listings(3).await.is_empty());
        assert_eq!(fetch.calls.lock().unwrap().len(), 3 * 2);
    }

    #[tokio::test]
    async fn test_run_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sankt-peterburg/nedvizhimost"))
            .and(query_param("p", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(three_listings("spb")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sankt-peterburg/nedvizhimost"))
            .and(query_param("p", "2"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let config = ScraperConfig {
            base_url: format!("{}/sankt-peterburg/nedvizhimost", server.uri()),
            pacing: PacingConfig::disabled(),
            ..ScraperConfig::default()
        };
        let http = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let retry = RetryFetch::new(http, config.max_retries, config.pacing.retry, NoDelay);
        let scraper = ListingScraper::new(config, retry, NoDelay).unwrap();

        let listings = scraper.scrape_listings(2).await;
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].link, format!("{}/spb/a", server.uri()));
        assert_eq!(listings[1].link, format!("{}/spb/b", server.uri()));
        assert_eq!(listings[2].link, "N/A");
        assert_eq!(listings[2].price, "N/A");
    }
}
