//! Scraping of a single result page.

use super::ListingScraper;
use super::listing::parse_listing;
use crate::document::DocumentQuery;
use crate::error::{Result, ScrapeError};
use crate::fetch::Fetch;
use crate::models::Listing;
use crate::pacing::{DelayStrategy, pause};
use crate::utils::truncate_for_log;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

impl<F, D, Q> ListingScraper<F, D, Q>
where
    F: Fetch,
    D: DelayStrategy,
    Q: DocumentQuery,
{
    /// URL of result page `page`: the base URL plus the page query parameter.
    pub fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|source| ScrapeError::InvalidUrl {
            input: self.config.base_url.clone(),
            source,
        })?;
        url.query_pairs_mut()
            .append_pair(&self.config.page_param, &page.to_string());
        Ok(url)
    }

    /// Fetch page `page` and extract every listing on it.
    ///
    /// Never fails: a page that cannot be fetched or parsed is logged and
    /// yields an empty vector. Listings that fail extraction are skipped.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape_page(&self, page: u32) -> Vec<Listing> {
        info!("Scraping page");
        match self.try_scrape_page(page).await {
            Ok(listings) => {
                info!(count = listings.len(), "Scraped page");
                listings
            }
            Err(e) => {
                error!(error = %e, "Error scraping page; no listings kept");
                Vec::new()
            }
        }
    }

    async fn try_scrape_page(&self, page: u32) -> Result<Vec<Listing>> {
        let url = self.page_url(page)?;
        let html = self.fetcher.fetch(url.as_str()).await?;
        if html.trim().is_empty() {
            return Err(ScrapeError::EmptyBody(url.to_string()));
        }

        let fragments = self.query.fragments(&html, &self.config.selectors.listing)?;
        if fragments.is_empty() {
            warn!(%url, selector = %self.config.selectors.listing, "No listing fragments on page");
            return Ok(Vec::new());
        }
        debug!(fragments = fragments.len(), "Located listing fragments");

        let mut results = Vec::with_capacity(fragments.len());
        for (i, fragment) in fragments.iter().enumerate() {
            if i > 0 {
                pause(&self.delay, self.config.pacing.between_listings, "between listings").await;
            }

            let parsed = {
                let node = self.query.parse_fragment(fragment);
                parse_listing(&node, &self.config.selectors, &self.origin)
            };
            match parsed {
                Some(listing) => {
                    if listing.is_title_only() {
                        debug!(title = %listing.title, "Keeping listing with title only");
                    }
                    results.push(listing);
                }
                None => debug!(
                    index = i,
                    fragment = %truncate_for_log(fragment, 200),
                    "Skipped listing fragment"
                ),
            }
        }

        if results.len() < fragments.len() {
            warn!(
                skipped = fragments.len() - results.len(),
                total = fragments.len(),
                "Some listings could not be parsed"
            );
        }
        Ok(results)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Page markup wrapping the given listing fragments.
    pub fn page(items: &[String]) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>Недвижимость</title></head><body>
<div class="items-items-pZX46">{}</div>
<div class="js-pages pagination-pagination-Oz4Ri"></div>
</body></html>"#,
            items.join("\n")
        )
    }

    pub fn item(title: Option<&str>, price: Option<&str>, href: Option<&str>) -> String {
        let mut inner = String::new();
        if let Some(t) = title {
            let h3 = format!(r#"<h3 itemprop="name">{t}</h3>"#);
            match href {
                Some(h) => inner.push_str(&format!(
                    r#"<a data-marker="item-title" href="{h}">{h3}</a>"#
                )),
                None => inner.push_str(&h3),
            }
        } else if let Some(h) = href {
            inner.push_str(&format!(r#"<a data-marker="item-title" href="{h}">photo</a>"#));
        }
        if let Some(p) = price {
            inner.push_str(&format!(r#"<p data-marker="item-price"><span>{p}</span></p>"#));
        }
        inner.push_str(r#"<div data-marker="item-address"><span>Центральный р-н</span></div>"#);
        format!(r#"<div class="iva-item-root-Kcj9I" data-marker="item">{inner}</div>"#)
    }
}
