//! Randomized request headers.
//!
//! Each fetch gets a fresh header set so consecutive requests do not share a
//! single browser signature.

use rand::{Rng, rng};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};

/// Browser signatures the `User-Agent` header is drawn from.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:131.0) Gecko/20100101 Firefox/131.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:130.0) Gecko/20100101 Firefox/130.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36 Edg/129.0.0.0",
];

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Pick one entry of [`USER_AGENTS`] at random.
pub fn random_user_agent() -> &'static str {
    let i = rng().random_range(0..USER_AGENTS.len());
    USER_AGENTS[i]
}

/// Build the header set for one request.
///
/// Always contains `User-Agent`, `Accept`, `Accept-Language`, and
/// `Connection`; only the user agent varies between calls.
pub fn headers() -> HeaderMap {
    let mut h = HeaderMap::with_capacity(4);
    h.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
    h.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    h.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    h.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    h
}
