//! Field extraction for a single listing fragment.
//!
//! The title is the anchor of a listing: a fragment without one is rejected.
//! Price, location, and link are optional and fall back to
//! [`NOT_AVAILABLE`]. Relative links are resolved against the site origin.

use crate::config::ListingSelectors;
use crate::document::NodeQuery;
use crate::error::{Result, ScrapeError};
use crate::models::{Listing, NOT_AVAILABLE};
use crate::utils::normalize_text;
use chrono::Local;
use tracing::{debug, warn};
use url::Url;

/// Extract one listing, or report why the fragment is unusable.
pub fn extract_listing<N: NodeQuery>(
    node: &N,
    selectors: &ListingSelectors,
    origin: &Url,
) -> Result<Listing> {
    let title = node
        .find(&selectors.title)?
        .map(|el| normalize_text(&el.text))
        .filter(|t| !t.is_empty())
        .ok_or(ScrapeError::MissingTitle)?;

    let price = text_or_sentinel(node, &selectors.price)?;
    let location = text_or_sentinel(node, &selectors.location)?;

    let link = match node.find(&selectors.link)? {
        Some(el) => {
            let href = el.attr("href").ok_or(ScrapeError::MissingHref)?;
            absolute_link(origin, href)?
        }
        None => NOT_AVAILABLE.to_string(),
    };

    Ok(Listing {
        title,
        price,
        location,
        link,
        scraped_at: Local::now(),
    })
}

/// Like [`extract_listing`], but logs the failure and yields `None`.
pub fn parse_listing<N: NodeQuery>(
    node: &N,
    selectors: &ListingSelectors,
    origin: &Url,
) -> Option<Listing> {
    match extract_listing(node, selectors, origin) {
        Ok(listing) => {
            debug!(title = %listing.title, link = %listing.link, "Parsed listing");
            Some(listing)
        }
        Err(e) => {
            warn!(error = %e, "Error parsing listing; skipping");
            None
        }
    }
}

fn text_or_sentinel<N: NodeQuery>(node: &N, selector: &str) -> Result<String> {
    Ok(node
        .find(selector)?
        .map(|el| normalize_text(&el.text))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
}

/// Resolve an `href` against the site origin.
///
/// Links that resolve outside the origin (other hosts, protocol-relative
/// hrefs, `javascript:` or `mailto:` schemes) are replaced by the sentinel.
fn absolute_link(origin: &Url, href: &str) -> Result<String> {
    let href = href.trim();
    if href.is_empty() {
        return Ok(NOT_AVAILABLE.to_string());
    }
    let resolved = origin.join(href).map_err(|source| ScrapeError::InvalidUrl {
        input: href.to_string(),
        source,
    })?;
    if resolved.origin() != origin.origin() {
        warn!(href, "Link leaves the site origin; dropping it");
        return Ok(NOT_AVAILABLE.to_string());
    }
    Ok(resolved.into())
}
