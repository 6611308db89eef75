//! Land-book: landing page gallery with native search.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::error::SearchError;
use crate::http::fetch_html;
use crate::provider::DesignProvider;
use crate::scrape::{
    absolute_src, attr, closest, declared_width, first_text, resolve_href, selector,
    RecordCollector,
};
use crate::types::{DesignRecord, ProviderKind};

/// Queries too generic to send to Land-book search; the homepage is used instead.
const GENERIC_QUERIES: &[&str] = &["design", "website"];

/// Images narrower than this are icons or logos.
const MIN_WIDTH: u32 = 100;

const DEFAULT_TITLE: &str = "Land-book Design";

/// Land-book search scraper.
pub struct LandBookProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LandBookProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, ProviderKind::LandBook.default_base_url())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Search URL for `query`, or the homepage for empty/generic queries.
    fn search_url(&self, query: &str) -> Result<String, SearchError> {
        if query.is_empty() || GENERIC_QUERIES.contains(&query) {
            return Ok(self.base_url.clone());
        }
        let mut url = Url::parse(&format!("{}/websites", self.base_url))
            .map_err(|e| SearchError::Parse(format!("invalid Land-book URL: {e}")))?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url.into())
    }
}

#[async_trait]
impl DesignProvider for LandBookProvider {
    fn name(&self) -> &str {
        ProviderKind::LandBook.name()
    }

    fn slug(&self) -> &str {
        ProviderKind::LandBook.slug()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError> {
        tracing::trace!(query, "Land-book search");
        let url = self.search_url(query)?;
        let html = fetch_html(&self.client, &url).await?;
        parse_landbook_html(&html, &self.base_url, limit)
    }
}

/// Parse a Land-book listing page into at most `limit` records.
pub(crate) fn parse_landbook_html(
    html: &str,
    base_url: &str,
    limit: usize,
) -> Result<Vec<DesignRecord>, SearchError> {
    let document = Html::parse_document(html);
    let img_sel = selector(r#"img[src*="cdn.land-book.com"]"#)?;
    let link_sel = selector("a")?;
    let card_sel = selector("div, li, article")?;
    let title_sel = selector("h2, h3, .title")?;

    let mut collector = RecordCollector::new(limit);

    for img in document.select(&img_sel) {
        if collector.is_full() {
            break;
        }
        let width = declared_width(img);
        if width > 0 && width < MIN_WIDTH {
            continue;
        }

        let src = attr(img, "src").unwrap_or_default();
        let href = closest(img, &link_sel)
            .and_then(|a| attr(a, "href"))
            .unwrap_or_default();
        let title = closest(img, &card_sel)
            .and_then(|card| first_text(card, &title_sel))
            .or_else(|| attr(img, "alt"))
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        collector.push(DesignRecord::new(
            absolute_src(base_url, &src),
            title,
            ProviderKind::LandBook.name(),
            resolve_href(base_url, &href),
        ));
    }

    let designs = collector.into_records();
    tracing::debug!(count = designs.len(), "Land-book results parsed");
    Ok(designs)
}
