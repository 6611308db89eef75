//! Brutalist Websites: a long single-page index of raw, unpolished sites.
//!
//! No search endpoint. Three times the requested number of entries is
//! scraped so local filtering over titles and site URLs has room to work.

use async_trait::async_trait;
use scraper::Html;

use crate::error::SearchError;
use crate::filter::{filter_by_keyword, title_and_url_fields};
use crate::http::fetch_html;
use crate::provider::DesignProvider;
use crate::scrape::{
    absolute_src, attr, closest, first_text, selector, truncate_chars, RecordCollector,
    MAX_TITLE_CHARS,
};
use crate::types::{DesignRecord, ProviderKind};

/// Queries that match every Brutalist listing.
const PASSTHROUGH: &[&str] = &["design", "website", "brutalist"];

/// Over-fetch factor for local filtering.
const SCAN_FACTOR: usize = 3;

const DEFAULT_TITLE: &str = "Brutalist Design";

/// Brutalist Websites index scraper.
pub struct BrutalistProvider {
    client: reqwest::Client,
    base_url: String,
}

impl BrutalistProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, ProviderKind::Brutalist.default_base_url())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl DesignProvider for BrutalistProvider {
    fn name(&self) -> &str {
        ProviderKind::Brutalist.name()
    }

    fn slug(&self) -> &str {
        ProviderKind::Brutalist.slug()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError> {
        tracing::trace!(query, "Brutalist Websites search");
        let html = fetch_html(&self.client, &self.base_url).await?;
        let designs = parse_brutalist_html(&html, &self.base_url, limit.saturating_mul(SCAN_FACTOR))?;
        Ok(filter_by_keyword(
            designs,
            query,
            PASSTHROUGH,
            title_and_url_fields,
            limit,
        ))
    }
}

/// Parse the Brutalist Websites index into at most `max` records.
///
/// `source_url` is the listed site itself when the entry links out
/// absolutely, else `""`.
pub(crate) fn parse_brutalist_html(
    html: &str,
    base_url: &str,
    max: usize,
) -> Result<Vec<DesignRecord>, SearchError> {
    let document = Html::parse_document(html);
    let img_sel = selector(r#"img[src*="_img/"]"#)?;
    let link_sel = selector("a")?;
    let card_sel = selector("div, li, section")?;
    let title_sel = selector("h2, h3, .title, p")?;

    let mut collector = RecordCollector::new(max);

    for img in document.select(&img_sel) {
        if collector.is_full() {
            break;
        }
        let src = attr(img, "src").unwrap_or_default();
        let href = closest(img, &link_sel)
            .and_then(|a| attr(a, "href"))
            .filter(|href| href.starts_with("http"))
            .unwrap_or_default();
        let title = closest(img, &card_sel)
            .and_then(|card| first_text(card, &title_sel))
            .or_else(|| attr(img, "alt"))
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        collector.push(DesignRecord::new(
            absolute_src(base_url, &src),
            truncate_chars(&title, MAX_TITLE_CHARS),
            ProviderKind::Brutalist.name(),
            href,
        ));
    }

    let designs = collector.into_records();
    tracing::debug!(count = designs.len(), "Brutalist Websites results parsed");
    Ok(designs)
}
