//! Godly: hand-picked web design gallery.
//!
//! Godly has no search endpoint, so the homepage listing is scraped and
//! filtered locally by title. Preview images are mostly set through inline
//! `background-image` styles, with plain `<img>` tags as a backfill.

use async_trait::async_trait;
use regex::Regex;
use scraper::Html;

use crate::error::SearchError;
use crate::filter::{filter_by_keyword, title_field};
use crate::http::fetch_html;
use crate::provider::DesignProvider;
use crate::scrape::{attr, closest, first_text, resolve_href, selector, RecordCollector};
use crate::types::{DesignRecord, ProviderKind};

/// Queries that match every Godly listing.
const PASSTHROUGH: &[&str] = &["design", "website", "web"];

/// Host fragment that identifies Godly preview images.
const CDN_HOST: &str = "cdn.godly.website";

const DEFAULT_TITLE: &str = "Godly Design";

/// Godly homepage scraper.
pub struct GodlyProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GodlyProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, ProviderKind::Godly.default_base_url())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl DesignProvider for GodlyProvider {
    fn name(&self) -> &str {
        ProviderKind::Godly.name()
    }

    fn slug(&self) -> &str {
        ProviderKind::Godly.slug()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError> {
        tracing::trace!(query, "Godly search");
        let html = fetch_html(&self.client, &self.base_url).await?;
        let designs = parse_godly_html(&html, &self.base_url, limit)?;
        Ok(filter_by_keyword(designs, query, PASSTHROUGH, title_field, limit))
    }
}

/// Parse the Godly homepage into at most `limit` records.
pub(crate) fn parse_godly_html(
    html: &str,
    base_url: &str,
    limit: usize,
) -> Result<Vec<DesignRecord>, SearchError> {
    let document = Html::parse_document(html);
    let styled_sel = selector(r#"[style*="background-image"]"#)?;
    let img_sel = selector(r#"img[src*="cdn.godly.website"]"#)?;
    let link_sel = selector("a")?;
    let title_sel = selector("h2, h3, span")?;
    let background = Regex::new(r#"background-image:\s*url\(["']?([^"')]+)["']?\)"#)
        .map_err(|e| SearchError::Parse(format!("invalid background pattern: {e}")))?;

    let mut collector = RecordCollector::new(limit);

    for element in document.select(&styled_sel) {
        if collector.is_full() {
            break;
        }
        let style = element.value().attr("style").unwrap_or_default();
        let Some(image_url) = background.captures(style).map(|caps| caps[1].to_owned()) else {
            continue;
        };
        if !image_url.contains(CDN_HOST) {
            continue;
        }

        let link = closest(element, &link_sel);
        let href = link.and_then(|a| attr(a, "href")).unwrap_or_default();
        let title = link
            .and_then(|a| first_text(a, &title_sel).or_else(|| attr(a, "title")))
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        collector.push(DesignRecord::new(
            image_url,
            title,
            ProviderKind::Godly.name(),
            resolve_href(base_url, &href),
        ));
    }

    for img in document.select(&img_sel) {
        if collector.is_full() {
            break;
        }
        let image_url = attr(img, "src").unwrap_or_default();
        let href = closest(img, &link_sel)
            .and_then(|a| attr(a, "href"))
            .unwrap_or_default();
        let title = attr(img, "alt").unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        collector.push(DesignRecord::new(
            image_url,
            title,
            ProviderKind::Godly.name(),
            resolve_href(base_url, &href),
        ));
    }

    let designs = collector.into_records();
    tracing::debug!(count = designs.len(), "Godly results parsed");
    Ok(designs)
}
