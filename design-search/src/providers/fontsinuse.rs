//! Fonts In Use: typography in the wild.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::error::SearchError;
use crate::http::fetch_html;
use crate::provider::DesignProvider;
use crate::scrape::{
    absolute_src, attr, closest, declared_width, first_text, resolve_href, selector,
    truncate_chars, RecordCollector, MAX_TITLE_CHARS,
};
use crate::types::{DesignRecord, ProviderKind};

/// Queries that fall back to the staff-picks listing instead of search.
const GENERIC_QUERIES: &[&str] = &["design", "fonts"];

/// Images narrower than this are glyph thumbnails or icons.
const MIN_WIDTH: u32 = 50;

const DEFAULT_TITLE: &str = "Fonts In Use";

/// Fonts In Use search scraper.
pub struct FontsInUseProvider {
    client: reqwest::Client,
    base_url: String,
}

impl FontsInUseProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, ProviderKind::FontsInUse.default_base_url())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn search_url(&self, query: &str) -> Result<String, SearchError> {
        let mut url = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| SearchError::Parse(format!("invalid Fonts In Use URL: {e}")))?;
        if query.is_empty() || GENERIC_QUERIES.contains(&query) {
            url.query_pairs_mut().append_pair("filters", "staff-picks-only");
        } else {
            url.query_pairs_mut().append_pair("search", query);
        }
        Ok(url.into())
    }
}

#[async_trait]
impl DesignProvider for FontsInUseProvider {
    fn name(&self) -> &str {
        ProviderKind::FontsInUse.name()
    }

    fn slug(&self) -> &str {
        ProviderKind::FontsInUse.slug()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError> {
        tracing::trace!(query, "Fonts In Use search");
        let url = self.search_url(query)?;
        let html = fetch_html(&self.client, &url).await?;
        parse_fontsinuse_html(&html, &self.base_url, limit)
    }
}

/// Parse a Fonts In Use listing into at most `limit` records.
pub(crate) fn parse_fontsinuse_html(
    html: &str,
    base_url: &str,
    limit: usize,
) -> Result<Vec<DesignRecord>, SearchError> {
    let document = Html::parse_document(html);
    let img_sel = selector(r#"img[src*="assets.fontsinuse.com"], img[src*="/use-media-items/"]"#)?;
    let link_sel = selector("a")?;
    let card_sel = selector("div, li, article, .use")?;
    let title_sel = selector("h2, h3, .title, .use-title")?;

    let mut collector = RecordCollector::new(limit);

    for img in document.select(&img_sel) {
        if collector.is_full() {
            break;
        }
        let src = attr(img, "src").unwrap_or_default();
        if !(src.starts_with("http") || src.starts_with('/')) {
            continue;
        }
        let width = declared_width(img);
        if width > 0 && width < MIN_WIDTH {
            continue;
        }

        let href = closest(img, &link_sel)
            .and_then(|a| attr(a, "href"))
            .unwrap_or_default();
        let title = closest(img, &card_sel)
            .and_then(|card| first_text(card, &title_sel))
            .or_else(|| attr(img, "alt"))
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        collector.push(DesignRecord::new(
            absolute_src(base_url, &src),
            truncate_chars(&title, MAX_TITLE_CHARS),
            ProviderKind::FontsInUse.name(),
            resolve_href(base_url, &href),
        ));
    }

    let designs = collector.into_records();
    tracing::debug!(count = designs.len(), "Fonts In Use results parsed");
    Ok(designs)
}
