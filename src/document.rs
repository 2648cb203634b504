//! Markup traversal behind a narrow query interface.
//!
//! The extractor only ever asks two questions: "which listing fragments does
//! this page contain" and "what is the first element matching this selector
//! inside a fragment". [`DocumentQuery`] and [`NodeQuery`] capture exactly
//! that, and [`HtmlQuery`] answers them with the `scraper` crate.
//!
//! Fragments are handed around as owned markup strings, so no parsed tree is
//! held across an `.await` point in the page loop.

use crate::error::{Result, ScrapeError};
use scraper::{Html, Selector};

/// Snapshot of one matched element: its text content and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedElement {
    pub text: String,
    attributes: Vec<(String, String)>,
}

impl MatchedElement {
    pub fn new(text: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Queries against one parsed listing fragment.
pub trait NodeQuery {
    /// First element matching `selector`, or `None` if nothing matches.
    fn find(&self, selector: &str) -> Result<Option<MatchedElement>>;
}

/// Splits a page into listing fragments and parses single fragments.
pub trait DocumentQuery {
    type Node: NodeQuery;

    /// Outer markup of every element matching `selector`, in document order.
    fn fragments(&self, page: &str, selector: &str) -> Result<Vec<String>>;

    fn parse_fragment(&self, fragment: &str) -> Self::Node;
}

/// `scraper`-backed document engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlQuery;

/// A fragment parsed by [`HtmlQuery`].
#[derive(Debug)]
pub struct HtmlNode(Html);

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| ScrapeError::Selector(sel_str.into()))
}

/// Check that `selector` is something [`HtmlQuery`] can use.
pub fn validate_selector(selector: &str) -> Result<()> {
    create_selector(selector).map(|_| ())
}

impl DocumentQuery for HtmlQuery {
    type Node = HtmlNode;

    fn fragments(&self, page: &str, selector: &str) -> Result<Vec<String>> {
        let sel = create_selector(selector)?;
        let doc = Html::parse_document(page);
        Ok(doc.select(&sel).map(|el| el.html()).collect())
    }

    fn parse_fragment(&self, fragment: &str) -> HtmlNode {
        HtmlNode(Html::parse_fragment(fragment))
    }
}

impl NodeQuery for HtmlNode {
    fn find(&self, selector: &str) -> Result<Option<MatchedElement>> {
        let sel = create_selector(selector)?;
        Ok(self.0.select(&sel).next().map(|el| {
            let attributes = el
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            MatchedElement::new(el.text().collect::<String>(), attributes)
        }))
    }
}
