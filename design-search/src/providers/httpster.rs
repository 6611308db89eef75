//! Httpster: curated website showcase.
//!
//! No search endpoint: the homepage is scraped and filtered locally by
//! title. Preview images use lazy-loading, so `data-src` is read when
//! `src` is missing.

use async_trait::async_trait;
use scraper::Html;

use crate::error::SearchError;
use crate::filter::{filter_by_keyword, title_field};
use crate::http::fetch_html;
use crate::provider::DesignProvider;
use crate::scrape::{absolute_src, attr, closest, first_text, resolve_href, selector, RecordCollector};
use crate::types::{DesignRecord, ProviderKind};

/// Queries that match every Httpster listing.
const PASSTHROUGH: &[&str] = &["design", "website", "web"];

const DEFAULT_TITLE: &str = "Httpster Design";

/// Httpster homepage scraper.
pub struct HttpsterProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpsterProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, ProviderKind::Httpster.default_base_url())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl DesignProvider for HttpsterProvider {
    fn name(&self) -> &str {
        ProviderKind::Httpster.name()
    }

    fn slug(&self) -> &str {
        ProviderKind::Httpster.slug()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError> {
        tracing::trace!(query, "Httpster search");
        let html = fetch_html(&self.client, &self.base_url).await?;
        let designs = parse_httpster_html(&html, &self.base_url, limit)?;
        Ok(filter_by_keyword(designs, query, PASSTHROUGH, title_field, limit))
    }
}

/// Parse the Httpster homepage into at most `limit` records.
pub(crate) fn parse_httpster_html(
    html: &str,
    base_url: &str,
    limit: usize,
) -> Result<Vec<DesignRecord>, SearchError> {
    let document = Html::parse_document(html);
    let preview_sel = selector(r#"img.Preview__img, img[class*="Preview"]"#)?;
    let media_sel = selector(r#"img[src*="/assets/media/"]"#)?;
    let link_sel = selector("a")?;
    let card_sel = selector("div, li, article")?;
    let title_sel = selector("h2, h3, .title, .name")?;

    let mut collector = RecordCollector::new(limit);

    for img in document.select(&preview_sel) {
        if collector.is_full() {
            break;
        }
        let Some(src) = attr(img, "src").or_else(|| attr(img, "data-src")) else {
            continue;
        };
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
            ProviderKind::Httpster.name(),
            resolve_href(base_url, &href),
        ));
    }

    for img in document.select(&media_sel) {
        if collector.is_full() {
            break;
        }
        let src = attr(img, "src").unwrap_or_default();
        let title = attr(img, "alt").unwrap_or_else(|| DEFAULT_TITLE.to_owned());
        collector.push(DesignRecord::new(
            absolute_src(base_url, &src),
            title,
            ProviderKind::Httpster.name(),
            "",
        ));
    }

    let designs = collector.into_records();
    tracing::debug!(count = designs.len(), "Httpster results parsed");
    Ok(designs)
}
